//! The backend part of the backend: the database interface
//!
//! The primary entry point to this module is the function [get_store], which returns an object
//! implementing the [OpenHouseStore] trait. This object can be shared between threads in a global
//! application state and be used to create [OpenHouseStoreFacade] instances for interaction with
//! the database. These provide a CRUD-like interface, using the data models from the [models]
//! module.
//!
//! The primary implementation of [OpenHouseStore] ([postgres::PgDataStore]) wraps a PostgreSQL
//! connection pool and its corresponding [OpenHouseStoreFacade] objects
//! ([postgres::PgDataStoreFacade]) hold a reference to one pooled connection each, using the Diesel
//! query DSL for implementing the database interaction.
//!
//! There is also a mock implementation for unittests.

use crate::auth_session::SessionToken;
use crate::booking::{ConflictField, Station};
use crate::cli_error::CliError;
use auth_token::AdminToken;

pub mod auth_token;
pub mod models;
pub mod password;
mod postgres;
mod schema;
mod util;

/// Get an [OpenHouseStore] instance for the given database.
///
/// The database_url must be a PostgreSQL connection url, following the schema
/// "postgres://{user}:{password}@{host}/{database}".
pub fn get_store(database_url: &str) -> Result<impl OpenHouseStore, CliError> {
    postgres::PgDataStore::new(database_url).map_err(CliError::from)
}

pub type ReservationId = i32;
pub type ScanId = i32;
pub type AdminId = i32;

pub trait OpenHouseStoreFacade {
    /// Insert a new reservation, after checking that neither its email, nor its team name, nor
    /// its time slot is used by another reservation of the same station (checked in this order).
    ///
    /// # return value
    /// - `Ok(reservation)` with the stored reservation, including id and timestamps
    /// - `Err(StoreError::Conflict(field))` if the first conflicting field is `field`. Nothing has
    ///   been inserted in this case.
    /// - `Err(_)` if something different went wrong, as usual
    fn create_reservation(
        &mut self,
        reservation: models::NewReservation,
    ) -> Result<models::Reservation, StoreError>;

    /// Get all reservations of the station with the given (normalized) email address, newest first
    fn get_reservations_by_email(
        &mut self,
        station: Station,
        email: &str,
    ) -> Result<Vec<models::Reservation>, StoreError>;

    /// Get a single reservation, if it exists at the station and has been made with the given email
    /// address. Otherwise, `StoreError::NotExisting` is returned.
    fn get_reservation_with_email(
        &mut self,
        station: Station,
        reservation_id: ReservationId,
        email: &str,
    ) -> Result<models::Reservation, StoreError>;

    /// Move a reservation to a different time slot, atomically.
    ///
    /// Within a single transaction, the new time slot is checked to be free (ignoring the
    /// reservation itself), the reservation is loaded and updated.
    ///
    /// # return value
    /// - `Err(StoreError::Conflict(ConflictField::TimeSlot))` if another reservation of the station
    ///   occupies the slot
    /// - `Err(StoreError::NotExisting)` if the reservation does not exist at this station
    fn change_time_slot(
        &mut self,
        station: Station,
        reservation_id: ReservationId,
        new_time_slot: &str,
    ) -> Result<models::TimeSlotChange, StoreError>;

    /// Delete the reservation with the given id, if it exists at the station and has been made with
    /// the given email address. Returns the deleted reservation's data.
    fn delete_reservation(
        &mut self,
        station: Station,
        reservation_id: ReservationId,
        email: &str,
    ) -> Result<models::Reservation, StoreError>;

    /// Get the time slots of all reservations of the station
    fn get_taken_time_slots(&mut self, station: Station) -> Result<Vec<String>, StoreError>;

    /// Add a record to the attendance log, unless the same (time_slot, team_name, station) has
    /// been recorded before.
    ///
    /// Returns `Ok(true)` if the record has been inserted, `Ok(false)` if it existed already.
    fn record_scan(&mut self, scan: models::NewScan) -> Result<bool, StoreError>;

    /// Get reservations of all stations matching the filter, newest first
    fn get_reservations_filtered(
        &mut self,
        auth_token: &AdminToken,
        filter: ReservationFilter,
    ) -> Result<Vec<models::Reservation>, StoreError>;

    /// Get number of reservations and number of distinct time slots per station. Stations without
    /// any reservation may be omitted.
    fn get_reservation_counts(
        &mut self,
        auth_token: &AdminToken,
    ) -> Result<Vec<models::StationCounts>, StoreError>;

    /// Get the attendance log, newest records first
    fn get_scans(
        &mut self,
        auth_token: &AdminToken,
        station: Option<Station>,
    ) -> Result<Vec<models::Scan>, StoreError>;

    /// Try to authenticate a client as admin with the given credentials.
    ///
    /// On success, the given session token is updated with the admin's id. Unknown email and
    /// wrong password both result in `StoreError::NotExisting`.
    fn authenticate_admin(
        &mut self,
        email: &str,
        password: &str,
        session_token: &mut SessionToken,
    ) -> Result<(), StoreError>;

    /// Get an [AdminToken] for a client session, after checking that the session's admin account
    /// still exists.
    fn get_admin_token_for_session(
        &mut self,
        session_token: &SessionToken,
    ) -> Result<AdminToken, StoreError>;

    fn get_admins(&mut self, auth_token: &AdminToken) -> Result<Vec<models::Admin>, StoreError>;
    fn create_admin(
        &mut self,
        auth_token: &AdminToken,
        admin: models::NewAdmin,
    ) -> Result<AdminId, StoreError>;
    fn delete_admin(&mut self, auth_token: &AdminToken, admin_id: AdminId)
        -> Result<(), StoreError>;
}

/// Filter options for the admin listing of reservations
#[derive(Default, Debug, Clone)]
pub struct ReservationFilter {
    /// Only include reservations of this station
    pub station: Option<Station>,
    /// Only include reservations of exactly this time slot
    pub time_slot: Option<String>,
    /// Only include reservations whose team name or email contains this string (case-insensitive)
    pub search: Option<String>,
}

#[cfg(test)]
impl ReservationFilter {
    /// Checks if a given reservation matches the filter. The database implementation filters in
    /// SQL; this is used by the mock store.
    pub fn matches(&self, reservation: &models::Reservation) -> bool {
        if let Some(station) = self.station {
            if reservation.station != station {
                return false;
            }
        }
        if let Some(time_slot) = &self.time_slot {
            if &reservation.time_slot != time_slot {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let search = search.to_lowercase();
            if !reservation.team_name.to_lowercase().contains(&search)
                && !reservation.email.to_lowercase().contains(&search)
            {
                return false;
            }
        }
        true
    }
}

pub trait OpenHouseStore: Send + Sync {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn OpenHouseStoreFacade + 'a>, StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    /// Connection the database failed. See string description for details.
    ConnectionError(String),
    /// The query could not be executed because of some error not covered by the other members (see
    /// string description)
    QueryError(diesel::result::Error),
    /// Database transaction could not be commited due to a conflicting concurrent transaction
    TransactionConflict,
    /// The requested entity does not exist
    NotExisting,
    /// The reservation could not be stored, because the given field's value is already used by
    /// another reservation of the same station.
    Conflict(ConflictField),
    /// The entity could not be created because it already exists.
    ConflictEntityExists,
    /// The client's session does not belong to an existing admin account
    PermissionDenied,
    /// The provided data is invalid, i.e. it does not match the expected ranges or violates a
    /// SQL constraint. See string description for details.
    InvalidInputData(String),
    /// Some data queried from the database could not be deserialized. See string description for
    /// details.
    InvalidDataInDatabase(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::NotExisting,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => match info
                .constraint_name()
                .and_then(postgres::conflict_field_for_postgres_constraint)
            {
                Some(field) => Self::Conflict(field),
                None => Self::ConflictEntityExists,
            },
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                _,
            ) => Self::TransactionConflict,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation
                | diesel::result::DatabaseErrorKind::CheckViolation,
                info,
            ) => Self::InvalidInputData(
                info.constraint_name()
                    .and_then(postgres::description_for_postgres_constraint)
                    .unwrap_or(info.message())
                    .to_owned(),
            ),
            diesel::result::Error::SerializationError(e) => Self::InvalidInputData(e.to_string()),
            diesel::result::Error::DeserializationError(e) => {
                Self::InvalidDataInDatabase(e.to_string())
            }
            _ => Self::QueryError(error),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> Self {
        Self::ConnectionError(error.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Error connecting to database: {}", e),
            Self::QueryError(e) => write!(f, "Error while executing database query: {}", e),
            Self::TransactionConflict => f.write_str("Database transaction could not be commited due to a conflicting concurrent transaction"),
            Self::NotExisting => f.write_str("Database record does not exist."),
            Self::Conflict(field) => write!(f, "Value of {} is already used by another reservation.", field.name()),
            Self::ConflictEntityExists => f.write_str("Database record exists already."),
            Self::PermissionDenied => f.write_str("Client is not authenticated as admin."),
            Self::InvalidInputData(e) => {
                write!(f, "Data to be stored in database is not valid: {}", e)
            }
            StoreError::InvalidDataInDatabase(e) => {
                write!(f, "Data queried from database could not be deserialized: {}", e)
            },
        }
    }
}

impl std::error::Error for StoreError {}
