use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire value of a station ("table") of the event: `1` or `2`
pub type StationNumber = i16;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Reservation {
    pub id: i32,
    pub station: StationNumber,
    pub team_name: String,
    /// Number of participants of the team
    pub team_number: i32,
    pub email: String,
    pub time_slot: String,
    /// Human-readable slot range, e.g. "15:30 - 15:40"
    #[serde(rename = "timeDisplay")]
    pub time_display: String,
    /// Booking date as shown in the UI (dd.mm.YYYY)
    pub date: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewReservation {
    #[serde(default)]
    pub team_name: String,
    pub team_number: Option<i32>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub time_slot: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReservationResponse {
    pub reservation: Reservation,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReservationList {
    pub reservations: Vec<Reservation>,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimeSlotChangeRequest {
    pub new_time_slot: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimeSlotChange {
    pub id: i32,
    pub old_time_slot: String,
    pub new_time_slot: String,
    pub team_name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimeSlotChangeResponse {
    pub reservation: TimeSlotChange,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CancellationRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Availability {
    /// Maps each slot of the station's catalog to `true` if it is still free
    pub availability: BTreeMap<String, bool>,
    pub taken_slots: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimeSlotCatalog {
    pub station: StationNumber,
    pub time_slots: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScanData {
    pub time_slot: String,
    pub team_name: String,
    pub table: StationNumber,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanResult {
    pub saved: bool,
    pub message: String,
    pub data: ScanData,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanRecord {
    pub id: i32,
    pub time_slot: String,
    pub team_name: String,
    pub table: StationNumber,
    pub scanned_at: DateTime<Utc>,
}

/// Content of the QR code handed out for a reservation. The scanner reads it back and posts
/// `timeSlot`, `teamName` and `table` as [ScanData].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReservationQrPayload {
    #[serde(rename = "reservationId")]
    pub reservation_id: i32,
    #[serde(rename = "teamName")]
    pub team_name: String,
    pub email: String,
    #[serde(rename = "timeSlot")]
    pub time_slot: String,
    #[serde(rename = "participantCount")]
    pub participant_count: i32,
    pub table: StationNumber,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminInfo {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminLoginResponse {
    pub admin: AdminInfo,
    #[serde(rename = "sessionToken")]
    pub session_token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StationStatistics {
    pub station: StationNumber,
    pub total_reservations: i64,
    pub unique_time_slots: i64,
    pub free_time_slots: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReservationStatistics {
    pub total_reservations: i64,
    pub stations: Vec<StationStatistics>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminReservationList {
    pub reservations: Vec<Reservation>,
    pub stats: ReservationStatistics,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanList {
    pub scans: Vec<ScanRecord>,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: String,
    pub version: String,
}
