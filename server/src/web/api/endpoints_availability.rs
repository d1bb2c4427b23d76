use crate::booking::slot_catalog;
use crate::web::api::{parse_station, APIError};
use crate::web::AppState;
use actix_web::{get, web, Responder};
use openhouse_api_types::StationNumber;

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(openhouse_api_types::HealthInfo {
        status: "ok".to_owned(),
        version: crate::get_version().to_owned(),
    })
}

#[get("/stations/{station}/time_slots")]
async fn list_time_slots(path: web::Path<StationNumber>) -> Result<impl Responder, APIError> {
    let station = parse_station(path.into_inner())?;
    Ok(web::Json(openhouse_api_types::TimeSlotCatalog {
        station: station.number(),
        time_slots: slot_catalog::all_slots(station)
            .iter()
            .map(|slot| slot.to_string())
            .collect(),
    }))
}

#[get("/stations/{station}/availability")]
async fn get_availability(
    path: web::Path<StationNumber>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let station = parse_station(path.into_inner())?;
    let availability = web::block(move || -> Result<_, APIError> {
        Ok(crate::booking::get_availability(
            state.store.as_ref(),
            station,
        )?)
    })
    .await??;
    Ok(web::Json(availability))
}
