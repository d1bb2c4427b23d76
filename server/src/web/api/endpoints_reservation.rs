use crate::booking;
use crate::data_store::ReservationId;
use crate::web::api::{parse_station, APIError};
use crate::web::AppState;
use actix_web::{get, post, put, web, HttpResponse, Responder};
use openhouse_api_types::{ReservationStatus, StationNumber};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::Deserialize;

#[derive(Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

#[post("/stations/{station}/reservations")]
async fn create_reservation(
    path: web::Path<StationNumber>,
    data: web::Json<openhouse_api_types::NewReservation>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let station = parse_station(path.into_inner())?;
    let reservation: openhouse_api_types::Reservation =
        web::block(move || -> Result<_, APIError> {
            Ok(booking::create_reservation(
                state.store.as_ref(),
                station,
                data.into_inner(),
            )?)
        })
        .await??
        .into();
    Ok(HttpResponse::Created().json(openhouse_api_types::ReservationResponse { reservation }))
}

#[get("/stations/{station}/reservations")]
async fn list_reservations(
    path: web::Path<StationNumber>,
    query: web::Query<EmailQuery>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let station = parse_station(path.into_inner())?;
    let reservations: Vec<openhouse_api_types::Reservation> =
        web::block(move || -> Result<_, APIError> {
            Ok(booking::list_reservations_by_email(
                state.store.as_ref(),
                station,
                query.email.as_deref(),
            )?)
        })
        .await??
        .into_iter()
        .map(|r| r.into())
        .collect();
    Ok(web::Json(openhouse_api_types::ReservationList {
        count: reservations.len(),
        reservations,
    }))
}

#[put("/stations/{station}/reservations/{reservation_id}/time_slot")]
async fn change_time_slot(
    path: web::Path<(StationNumber, ReservationId)>,
    data: web::Json<openhouse_api_types::TimeSlotChangeRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let (station, reservation_id) = path.into_inner();
    let station = parse_station(station)?;
    let change = web::block(move || -> Result<_, APIError> {
        Ok(booking::change_time_slot(
            state.store.as_ref(),
            station,
            reservation_id,
            &data.new_time_slot,
        )?)
    })
    .await??;
    Ok(web::Json(openhouse_api_types::TimeSlotChangeResponse {
        reservation: change.into(),
    }))
}

#[post("/stations/{station}/reservations/{reservation_id}/cancel")]
async fn cancel_reservation(
    path: web::Path<(StationNumber, ReservationId)>,
    data: web::Json<openhouse_api_types::CancellationRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let (station, reservation_id) = path.into_inner();
    let station = parse_station(station)?;
    let cancelled = web::block(move || -> Result<_, APIError> {
        Ok(booking::cancel_reservation(
            state.store.as_ref(),
            station,
            reservation_id,
            &data.email,
        )?)
    })
    .await??;
    Ok(web::Json(openhouse_api_types::ReservationResponse {
        reservation: cancelled.into_api(ReservationStatus::Cancelled),
    }))
}

/// SVG image of the QR code which the visitors show at the station. It contains the reservation
/// data as JSON, which is posted back to the attendance log by the scanner.
#[get("/stations/{station}/reservations/{reservation_id}/qr.svg")]
async fn reservation_qr_code(
    path: web::Path<(StationNumber, ReservationId)>,
    query: web::Query<EmailQuery>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let (station, reservation_id) = path.into_inner();
    let station = parse_station(station)?;
    let reservation = web::block(move || -> Result<_, APIError> {
        Ok(booking::get_reservation_for_owner(
            state.store.as_ref(),
            station,
            reservation_id,
            query.email.as_deref(),
        )?)
    })
    .await??;

    let payload = serde_json::to_string(&reservation.qr_payload())
        .map_err(|e| APIError::InternalError(e.to_string()))?;
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| APIError::InternalError(format!("Could not create QR code: {}", e)))?;
    let image = code
        .render()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .body(image))
}
