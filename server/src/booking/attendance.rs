use super::{BookingError, Station};
use crate::data_store::{models, OpenHouseStore};
use log::info;

/// Add a scanned reservation QR code to the attendance log.
///
/// Time slot and team name are recorded verbatim (even if empty or not a valid slot), without
/// checking them against the reservations. Only the table must be a known station. Returns `false` if the same (time slot, team name, table) has been recorded
/// before.
pub fn record_scan(
    store: &dyn OpenHouseStore,
    data: openhouse_api_types::ScanData,
) -> Result<bool, BookingError> {
    let station =
        Station::try_from(data.table).map_err(|e| BookingError::Validation(e.to_string()))?;
    let saved = store.get_facade()?.record_scan(models::NewScan {
        time_slot: data.time_slot,
        team_name: data.team_name,
        station,
    })?;
    if saved {
        info!("Recorded attendance scan at {}", station);
    }
    Ok(saved)
}
