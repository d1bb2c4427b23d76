//! Input validation of the reservation engine.
//!
//! All checks in this module are pure: they run before the data store is touched, so a request
//! with invalid data never causes a database round trip.

use super::{slot_catalog, BookingError, Station};
use crate::data_store::models;
use lazy_static::lazy_static;

pub const MIN_TEAM_NUMBER: i32 = 1;
pub const MAX_TEAM_NUMBER: i32 = 8;
const MAX_TEXT_LENGTH: usize = 255;
const MAX_EMAIL_LENGTH: usize = 254;

/// Check an email address for syntactic validity and normalize it (trimmed, lowercase).
///
/// Addresses are compared case-insensitively, so the normalized form is used for storage and
/// lookups.
pub fn validate_email(value: &str) -> Result<String, BookingError> {
    lazy_static! {
        static ref RE: regex::Regex = regex::Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$"
        )
        .unwrap();
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::Validation(
            "Missing required field: email".to_owned(),
        ));
    }
    let local_part_length = value.find('@').unwrap_or(0);
    if value.len() > MAX_EMAIL_LENGTH
        || local_part_length > 64
        || value.starts_with('.')
        || value.contains("..")
        || value.contains(".@")
        || !RE.is_match(value)
    {
        return Err(BookingError::Validation("Invalid email format".to_owned()));
    }
    Ok(value.to_lowercase())
}

pub fn is_time_slot_format(value: &str) -> bool {
    lazy_static! {
        static ref RE: regex::Regex = regex::Regex::new(r"^\d{2}:\d{2}$").unwrap();
    }
    RE.is_match(value)
}

/// Check that the value is an "HH:MM" string and one of the station's bookable slots.
pub fn validate_time_slot(station: Station, value: &str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::Validation(
            "Missing required field: time_slot".to_owned(),
        ));
    }
    if !is_time_slot_format(value) {
        return Err(BookingError::Validation(
            "Invalid time slot format. Use HH:MM format".to_owned(),
        ));
    }
    if !slot_catalog::is_catalog_slot(station, value) {
        return Err(BookingError::Validation(format!(
            "Time slot {} is not offered at {}",
            value, station
        )));
    }
    Ok(value.to_owned())
}

pub fn validate_team_name(value: &str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::Validation(
            "Missing required field: team_name".to_owned(),
        ));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(BookingError::Validation(format!(
            "Team name must not be longer than {} characters",
            MAX_TEXT_LENGTH
        )));
    }
    Ok(value.to_owned())
}

pub fn validate_team_number(value: Option<i32>) -> Result<i32, BookingError> {
    match value {
        None => Err(BookingError::Validation(
            "Missing required field: team_number".to_owned(),
        )),
        Some(n) if !(MIN_TEAM_NUMBER..=MAX_TEAM_NUMBER).contains(&n) => {
            Err(BookingError::Validation(format!(
                "Participant count must be between {} and {}",
                MIN_TEAM_NUMBER, MAX_TEAM_NUMBER
            )))
        }
        Some(n) => Ok(n),
    }
}

/// Validate the data of a reservation request and convert it into the insertable model.
///
/// Missing fields are reported first (in the order team_name, team_number, email, time_slot),
/// then the format of the individual values.
pub fn validate_new_reservation(
    station: Station,
    data: openhouse_api_types::NewReservation,
) -> Result<models::NewReservation, BookingError> {
    let required = [
        ("team_name", data.team_name.trim().is_empty()),
        ("team_number", data.team_number.is_none()),
        ("email", data.email.trim().is_empty()),
        ("time_slot", data.time_slot.trim().is_empty()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
        return Err(BookingError::Validation(format!(
            "Missing required field: {}",
            field
        )));
    }
    let email = validate_email(&data.email)?;
    let team_number = validate_team_number(data.team_number)?;
    let team_name = validate_team_name(&data.team_name)?;
    let time_slot = validate_time_slot(station, &data.time_slot)?;
    Ok(models::NewReservation {
        station,
        team_name,
        team_number,
        email,
        time_slot,
    })
}
