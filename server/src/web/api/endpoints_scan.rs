use crate::booking;
use crate::web::api::APIError;
use crate::web::AppState;
use actix_web::{post, web, Responder};

#[post("/scans")]
async fn record_scan(
    data: web::Json<openhouse_api_types::ScanData>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let data = data.into_inner();
    let scan_data = data.clone();
    let saved = web::block(move || -> Result<_, APIError> {
        Ok(booking::record_scan(state.store.as_ref(), scan_data)?)
    })
    .await??;
    Ok(web::Json(openhouse_api_types::ScanResult {
        saved,
        message: if saved {
            "Scanner data saved successfully".to_owned()
        } else {
            "Record already exists, not saved".to_owned()
        },
        data,
    }))
}
