//! The reservation engine: rules for creating, looking up, moving and cancelling reservations of
//! the two stations, plus the attendance log of scanned reservation QR codes.
//!
//! All operations take the application's [crate::data_store::OpenHouseStore] and validate their input completely
//! before requesting a database connection from it. Uniqueness of email, team name and time slot
//! per station is checked by the store before inserting (to report the conflicting field), but is
//! ultimately guaranteed by the database's unique constraints.
//!
//! The engine knows nothing about admin authentication. Admin-only views are served by the web
//! layer directly from the store, using an [crate::data_store::auth_token::AdminToken].

use crate::data_store::StoreError;
use std::fmt::{Display, Formatter};

mod attendance;
mod reservations;
pub mod slot_catalog;
mod station;
mod statistics;
pub(crate) mod validation;

pub(crate) use attendance::record_scan;
pub(crate) use reservations::{
    cancel_reservation, change_time_slot, create_reservation, get_availability,
    get_reservation_for_owner, list_reservations_by_email,
};
pub use station::{Station, UnknownStationError};
pub(crate) use statistics::compute_statistics;

/// The field of a reservation that collides with an existing reservation of the same station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Email,
    TeamName,
    TimeSlot,
}

impl ConflictField {
    /// Name of the field in the API's JSON representation
    pub fn name(&self) -> &'static str {
        match self {
            ConflictField::Email => "email",
            ConflictField::TeamName => "team_name",
            ConflictField::TimeSlot => "time_slot",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConflictField::Email => "Email already exists",
            ConflictField::TeamName => "Team name already exists",
            ConflictField::TimeSlot => "Time slot is already taken",
        }
    }
}

#[derive(Debug)]
pub enum BookingError {
    /// Input data is missing or malformed. The string is a human-readable description.
    Validation(String),
    /// Email, team name or time slot is already used by another reservation of the station
    Conflict(ConflictField),
    /// The reservation does not exist (or does not belong to the given email address)
    NotFound,
    /// The database is not reachable
    StoreUnavailable(String),
    /// Any other failure. The description is meant for logging, not for the client.
    Unexpected(String),
}

impl Display for BookingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingError::Validation(e) => f.write_str(e),
            BookingError::Conflict(field) => f.write_str(field.message()),
            BookingError::NotFound => f.write_str("Reservation not found"),
            BookingError::StoreUnavailable(e) => write!(f, "Database unavailable: {}", e),
            BookingError::Unexpected(e) => write!(f, "Unexpected error: {}", e),
        }
    }
}

impl std::error::Error for BookingError {}

impl From<StoreError> for BookingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ConnectionError(e) => Self::StoreUnavailable(e),
            StoreError::NotExisting => Self::NotFound,
            StoreError::Conflict(field) => Self::Conflict(field),
            StoreError::InvalidInputData(e) => Self::Validation(e),
            e @ (StoreError::QueryError(_)
            | StoreError::TransactionConflict
            | StoreError::ConflictEntityExists
            | StoreError::PermissionDenied
            | StoreError::InvalidDataInDatabase(_)) => Self::Unexpected(e.to_string()),
        }
    }
}

