use super::validation::{validate_email, validate_new_reservation, validate_time_slot};
use super::{slot_catalog, BookingError, Station};
use crate::data_store::{models, OpenHouseStore, ReservationId};
use log::info;
use std::collections::BTreeMap;

/// Create a new reservation at the station.
///
/// Fails with [BookingError::Conflict] if the email, the team name or the time slot (checked in
/// this order) is already used by another reservation of the station.
pub fn create_reservation(
    store: &dyn OpenHouseStore,
    station: Station,
    data: openhouse_api_types::NewReservation,
) -> Result<models::Reservation, BookingError> {
    let reservation = validate_new_reservation(station, data)?;
    let created = store.get_facade()?.create_reservation(reservation)?;
    info!(
        "Created reservation {} for team \"{}\" at {} in time slot {}",
        created.id, created.team_name, station, created.time_slot
    );
    Ok(created)
}

pub fn list_reservations_by_email(
    store: &dyn OpenHouseStore,
    station: Station,
    email: Option<&str>,
) -> Result<Vec<models::Reservation>, BookingError> {
    let email = match email {
        Some(email) if !email.trim().is_empty() => validate_email(email)?,
        _ => {
            return Err(BookingError::Validation(
                "Email parameter is required".to_owned(),
            ))
        }
    };
    Ok(store
        .get_facade()?
        .get_reservations_by_email(station, &email)?)
}

/// Move a reservation to a different time slot of the same station.
///
/// The free-slot check is done before the existence check: Requesting a taken slot for an unknown
/// reservation results in a conflict, not in [BookingError::NotFound].
pub fn change_time_slot(
    store: &dyn OpenHouseStore,
    station: Station,
    reservation_id: ReservationId,
    new_time_slot: &str,
) -> Result<models::TimeSlotChange, BookingError> {
    if new_time_slot.trim().is_empty() {
        return Err(BookingError::Validation(
            "Missing required field: new_time_slot".to_owned(),
        ));
    }
    let new_time_slot = validate_time_slot(station, new_time_slot)?;
    let change = store
        .get_facade()?
        .change_time_slot(station, reservation_id, &new_time_slot)?;
    info!(
        "Moved reservation {} at {} from time slot {} to {}",
        change.id, station, change.old_time_slot, change.new_time_slot
    );
    Ok(change)
}

/// Cancel (i.e. delete) a reservation. The email must match the one the reservation was made with.
///
/// Returns the data of the deleted reservation.
pub fn cancel_reservation(
    store: &dyn OpenHouseStore,
    station: Station,
    reservation_id: ReservationId,
    email: &str,
) -> Result<models::Reservation, BookingError> {
    let email = validate_email(email)?;
    let cancelled = store
        .get_facade()?
        .delete_reservation(station, reservation_id, &email)?;
    info!(
        "Cancelled reservation {} of team \"{}\" at {} (time slot {})",
        cancelled.id, cancelled.team_name, station, cancelled.time_slot
    );
    Ok(cancelled)
}

/// Get a single reservation, proving ownership by the email address it was made with.
pub fn get_reservation_for_owner(
    store: &dyn OpenHouseStore,
    station: Station,
    reservation_id: ReservationId,
    email: Option<&str>,
) -> Result<models::Reservation, BookingError> {
    let email = validate_email(email.unwrap_or_default())?;
    Ok(store
        .get_facade()?
        .get_reservation_with_email(station, reservation_id, &email)?)
}

/// Get the free/taken state of each slot of the station's catalog.
///
/// `taken_slots` lists all time slots of the station's reservations, including any which are not
/// (or no longer) part of the catalog.
pub fn get_availability(
    store: &dyn OpenHouseStore,
    station: Station,
) -> Result<openhouse_api_types::Availability, BookingError> {
    let taken_slots = store.get_facade()?.get_taken_time_slots(station)?;
    let availability: BTreeMap<String, bool> = slot_catalog::all_slots(station)
        .iter()
        .map(|slot| (slot.to_string(), !taken_slots.iter().any(|t| t == slot)))
        .collect();
    Ok(openhouse_api_types::Availability {
        availability,
        taken_slots,
    })
}
