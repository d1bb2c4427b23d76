use crate::booking::{compute_statistics, slot_catalog, Station};
use crate::cli::CliAuthTokenKey;
use crate::cli_error::CliError;
use crate::data_store::auth_token::AdminToken;
use crate::data_store::{get_store, OpenHouseStore, ReservationFilter};
use crate::setup::DatabaseConfig;

pub fn print_reservation_list(
    config: &DatabaseConfig,
    station: Option<Station>,
) -> Result<(), CliError> {
    let data_store_pool = get_store(&config.database_url)?;
    let mut data_store = data_store_pool.get_facade()?;

    let auth_key = CliAuthTokenKey::new();
    let auth_token = AdminToken::create_for_cli(&auth_key);
    let reservations = data_store.get_reservations_filtered(
        &auth_token,
        ReservationFilter {
            station,
            ..Default::default()
        },
    )?;
    let statistics = compute_statistics(data_store.get_reservation_counts(&auth_token)?);

    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_header(vec![
            "id",
            "station",
            "time slot",
            "team name",
            "participants",
            "email",
            "booked at",
        ])
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
        .add_rows(reservations.into_iter().map(|reservation| {
            [
                reservation.id.to_string(),
                reservation.station.number().to_string(),
                slot_catalog::time_display(&reservation.time_slot),
                reservation.team_name,
                reservation.team_number.to_string(),
                reservation.email,
                reservation
                    .created_at
                    .format("%d.%m.%Y %H:%M:%S")
                    .to_string(),
            ]
        }));
    println!("{table}");

    for station_statistics in statistics.stations {
        println!(
            "Station {}: {} reservations, {} free time slots",
            station_statistics.station,
            station_statistics.total_reservations,
            station_statistics.free_time_slots
        );
    }
    println!("Total: {} reservations", statistics.total_reservations);
    Ok(())
}

pub fn print_scan_list(config: &DatabaseConfig, station: Option<Station>) -> Result<(), CliError> {
    let data_store_pool = get_store(&config.database_url)?;
    let mut data_store = data_store_pool.get_facade()?;

    let auth_key = CliAuthTokenKey::new();
    let auth_token = AdminToken::create_for_cli(&auth_key);
    let scans = data_store.get_scans(&auth_token, station)?;

    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_header(vec!["id", "station", "time slot", "team name", "scanned at"])
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
        .add_rows(scans.into_iter().map(|scan| {
            [
                scan.id.to_string(),
                scan.station.number().to_string(),
                scan.time_slot,
                scan.team_name,
                scan.scanned_at.format("%d.%m.%Y %H:%M:%S").to_string(),
            ]
        }));
    println!("{table}");
    Ok(())
}
