use crate::booking::{slot_catalog, Station};
use crate::data_store::{AdminId, ReservationId, ScanId};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use openhouse_api_types::ReservationStatus;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name=super::schema::reservations)]
pub struct Reservation {
    pub id: ReservationId,
    pub station: Station,
    pub team_name: String,
    pub team_number: i32,
    pub email: String,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Convert into the API representation, adding the derived display fields.
    ///
    /// Stored reservations are always active. `ReservationStatus::Cancelled` is only used for
    /// reporting the data of a reservation which has just been deleted.
    pub fn into_api(self, status: ReservationStatus) -> openhouse_api_types::Reservation {
        openhouse_api_types::Reservation {
            id: self.id,
            station: self.station.number(),
            time_display: slot_catalog::time_display(&self.time_slot),
            date: self.created_at.format("%d.%m.%Y").to_string(),
            team_name: self.team_name,
            team_number: self.team_number,
            email: self.email,
            time_slot: self.time_slot,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn qr_payload(&self) -> openhouse_api_types::ReservationQrPayload {
        openhouse_api_types::ReservationQrPayload {
            reservation_id: self.id,
            team_name: self.team_name.clone(),
            email: self.email.clone(),
            time_slot: self.time_slot.clone(),
            participant_count: self.team_number,
            table: self.station.number(),
        }
    }
}

impl From<Reservation> for openhouse_api_types::Reservation {
    fn from(value: Reservation) -> Self {
        value.into_api(ReservationStatus::Active)
    }
}

/// Validated data of a reservation to be inserted. Email is already normalized.
#[derive(Clone, Debug, Insertable)]
#[diesel(table_name=super::schema::reservations)]
pub struct NewReservation {
    pub station: Station,
    pub team_name: String,
    pub team_number: i32,
    pub email: String,
    pub time_slot: String,
}

/// Result of moving a reservation to a different time slot
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSlotChange {
    pub id: ReservationId,
    pub old_time_slot: String,
    pub new_time_slot: String,
    pub team_name: String,
    pub email: String,
}

impl From<TimeSlotChange> for openhouse_api_types::TimeSlotChange {
    fn from(value: TimeSlotChange) -> Self {
        Self {
            id: value.id,
            old_time_slot: value.old_time_slot,
            new_time_slot: value.new_time_slot,
            team_name: value.team_name,
            email: value.email,
        }
    }
}

#[derive(Clone, Debug, Queryable, Selectable)]
#[diesel(table_name=super::schema::scans)]
pub struct Scan {
    pub id: ScanId,
    pub time_slot: String,
    pub team_name: String,
    pub station: Station,
    pub scanned_at: DateTime<Utc>,
}

impl From<Scan> for openhouse_api_types::ScanRecord {
    fn from(value: Scan) -> Self {
        Self {
            id: value.id,
            time_slot: value.time_slot,
            team_name: value.team_name,
            table: value.station.number(),
            scanned_at: value.scanned_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Insertable)]
#[diesel(table_name=super::schema::scans)]
pub struct NewScan {
    pub time_slot: String,
    pub team_name: String,
    pub station: Station,
}

#[derive(Clone, Debug, Queryable, Selectable)]
#[diesel(table_name=super::schema::admins)]
pub struct Admin {
    pub id: AdminId,
    pub email: String,
    pub password_hash: String,
}

/// Data of a new admin account. `password_hash` must be created with
/// [super::password::hash_password].
#[derive(Clone, Debug, Insertable)]
#[diesel(table_name=super::schema::admins)]
pub struct NewAdmin {
    pub email: String,
    pub password_hash: String,
}

/// Aggregated reservation numbers of one station
#[derive(Clone, Debug, PartialEq, Queryable)]
pub struct StationCounts {
    pub station: Station,
    pub total_reservations: i64,
    pub unique_time_slots: i64,
}
