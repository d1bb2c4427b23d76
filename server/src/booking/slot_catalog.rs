//! The fixed list of bookable time slots per station.
//!
//! Slots are 10 minutes long and identified by their begin time as "HH:MM" string. The catalog is
//! a compile-time constant and not stored in the database.

use super::Station;
use chrono::NaiveTime;

/// Length of a single reservation
pub const SLOT_DURATION_MINUTES: i64 = 10;

const OPEN_HOUSE_SLOTS: [&str; 25] = [
    "15:00", "15:10", "15:20", "15:30", "15:40", //
    "16:00", "16:10", "16:20", "16:30", "16:40", //
    "17:00", "17:10", "17:20", "17:30", "17:40", //
    "18:00", "18:10", "18:20", "18:30", "18:40", //
    "19:00", "19:10", "19:20", "19:30", "19:40",
];

/// Get all bookable slots of the given station in chronological order.
pub fn all_slots(station: Station) -> &'static [&'static str] {
    match station {
        Station::One | Station::Two => &OPEN_HOUSE_SLOTS,
    }
}

pub fn is_catalog_slot(station: Station, slot: &str) -> bool {
    all_slots(station).contains(&slot)
}

/// Format the time range of a slot for display, e.g. "15:30 - 15:40".
///
/// Values which are not a valid "HH:MM" time are returned unchanged.
pub fn time_display(slot: &str) -> String {
    match NaiveTime::parse_from_str(slot, "%H:%M") {
        Ok(begin) => {
            let end = begin + chrono::Duration::minutes(SLOT_DURATION_MINUTES);
            format!("{} - {}", slot, end.format("%H:%M"))
        }
        Err(_) => slot.to_owned(),
    }
}
