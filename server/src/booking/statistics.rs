use super::{slot_catalog, Station};
use crate::data_store::models::StationCounts;

/// Build the reservation statistics for the admin console from the per-station counts of the
/// data store. Stations without reservations are reported with zero counts.
pub fn compute_statistics(counts: Vec<StationCounts>) -> openhouse_api_types::ReservationStatistics {
    let stations: Vec<openhouse_api_types::StationStatistics> = Station::ALL
        .iter()
        .map(|station| {
            let (total_reservations, unique_time_slots) = counts
                .iter()
                .find(|c| c.station == *station)
                .map(|c| (c.total_reservations, c.unique_time_slots))
                .unwrap_or((0, 0));
            let catalog_size = slot_catalog::all_slots(*station).len() as i64;
            openhouse_api_types::StationStatistics {
                station: station.number(),
                total_reservations,
                unique_time_slots,
                free_time_slots: (catalog_size - unique_time_slots).max(0),
            }
        })
        .collect();
    openhouse_api_types::ReservationStatistics {
        total_reservations: stations.iter().map(|s| s.total_reservations).sum(),
        stations,
    }
}
