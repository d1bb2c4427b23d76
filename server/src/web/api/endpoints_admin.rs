use crate::auth_session::SessionToken;
use crate::booking::{compute_statistics, Station};
use crate::data_store::{ReservationFilter, StoreError};
use crate::web::api::{
    extract_session_token, parse_station, APIError, SessionTokenHeader, SESSION_COOKIE_NAME,
};
use crate::web::AppState;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::{debug, info};
use openhouse_api_types::StationNumber;
use serde::Deserialize;

#[post("/admin/login")]
async fn login(
    data: web::Json<openhouse_api_types::AdminLoginRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let store = state.store.clone();
    let (session_token, auth) = web::block(move || -> Result<_, APIError> {
        let mut session_token = SessionToken::new();
        let mut store = store.get_facade()?;
        store
            .authenticate_admin(&data.email, &data.password, &mut session_token)
            .map_err(|e| match e {
                StoreError::NotExisting => APIError::AuthenticationFailed,
                e => e.into(),
            })?;
        let auth = store.get_admin_token_for_session(&session_token)?;
        Ok((session_token, auth))
    })
    .await??;
    info!("{} logged in", auth);

    let session_token = session_token.as_string(&state.secret);
    Ok(HttpResponse::Ok()
        .cookie(create_session_cookie(
            session_token.clone(),
            state.session_max_age,
        ))
        .json(openhouse_api_types::AdminLoginResponse {
            admin: openhouse_api_types::AdminInfo {
                email: auth.email().to_owned(),
            },
            session_token,
        }))
}

#[post("/admin/logout")]
async fn logout() -> impl Responder {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, "");
    cookie.set_path("/");
    cookie.make_removal();
    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({"success": true}))
}

#[get("/admin/session")]
async fn check_session(
    request: HttpRequest,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = extract_session_token(&state, &request, session_token_header)?;
    let admin_email = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_admin_token_for_session(&session_token)?;
        Ok(auth.email().to_owned())
    })
    .await??;
    Ok(web::Json(openhouse_api_types::AdminInfo { email: admin_email }))
}

#[derive(Deserialize)]
struct AdminReservationQuery {
    station: Option<StationNumber>,
    time_slot: Option<String>,
    search: Option<String>,
}

impl AdminReservationQuery {
    fn into_filter(self) -> Result<ReservationFilter, APIError> {
        Ok(ReservationFilter {
            station: parse_optional_station(self.station)?,
            time_slot: self.time_slot.filter(|s| !s.trim().is_empty()),
            search: self
                .search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[get("/admin/reservations")]
async fn list_reservations(
    request: HttpRequest,
    query: web::Query<AdminReservationQuery>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = extract_session_token(&state, &request, session_token_header)?;
    let filter = query.into_inner().into_filter()?;
    let (reservations, counts) = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_admin_token_for_session(&session_token)?;
        let reservations = store.get_reservations_filtered(&auth, filter)?;
        let counts = store.get_reservation_counts(&auth)?;
        debug!("{} listed {} reservations", auth, reservations.len());
        Ok((reservations, counts))
    })
    .await??;
    Ok(web::Json(openhouse_api_types::AdminReservationList {
        reservations: reservations.into_iter().map(|r| r.into()).collect(),
        stats: compute_statistics(counts),
    }))
}

#[derive(Deserialize)]
struct ScanQuery {
    station: Option<StationNumber>,
}

#[get("/admin/scans")]
async fn list_scans(
    request: HttpRequest,
    query: web::Query<ScanQuery>,
    state: web::Data<AppState>,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<impl Responder, APIError> {
    let session_token = extract_session_token(&state, &request, session_token_header)?;
    let station = parse_optional_station(query.station)?;
    let scans: Vec<openhouse_api_types::ScanRecord> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        let auth = store.get_admin_token_for_session(&session_token)?;
        let scans = store.get_scans(&auth, station)?;
        debug!("{} listed {} scans", auth, scans.len());
        Ok(scans)
    })
    .await??
    .into_iter()
    .map(|s| s.into())
    .collect();
    Ok(web::Json(openhouse_api_types::ScanList {
        count: scans.len(),
        scans,
    }))
}

/// Station filter from a query parameter. In contrast to the URL path, an unknown station is
/// invalid input here.
fn parse_optional_station(value: Option<StationNumber>) -> Result<Option<Station>, APIError> {
    value
        .map(|number| {
            parse_station(number)
                .map_err(|_| APIError::InvalidData(format!("Invalid station: {}", number)))
        })
        .transpose()
}

fn create_session_cookie(session_token: String, max_age: std::time::Duration) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, session_token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_expires(actix_web::cookie::time::OffsetDateTime::now_utc() + max_age);
    cookie
}
