use std::fmt::Display;

mod endpoints_admin;
mod endpoints_availability;
mod endpoints_reservation;
mod endpoints_scan;
#[cfg(test)]
mod tests;

use crate::auth_session::{SessionError, SessionToken};
use crate::booking::{BookingError, ConflictField, Station};
use crate::data_store::StoreError;
use crate::web::AppState;
use actix_web::error::JsonPayloadError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    web, HttpRequest, HttpResponse,
};
use serde_json::json;

pub const SESSION_COOKIE_NAME: &str = "openhouse-admin-session";

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(get_api_service());
}

fn get_api_service() -> actix_web::Scope {
    let json_config =
        web::JsonConfig::default().error_handler(|err, _req| APIError::InvalidJson(err).into());
    let query_config =
        web::QueryConfig::default().error_handler(|err, _req| APIError::InvalidQuery(err).into());
    let path_config = web::PathConfig::default().error_handler(|_err, _req| APIError::NotExisting.into());
    web::scope("/api/v1")
        .app_data(json_config)
        .app_data(query_config)
        .app_data(path_config)
        .service(endpoints_availability::health)
        .service(endpoints_availability::list_time_slots)
        .service(endpoints_availability::get_availability)
        .service(endpoints_reservation::create_reservation)
        .service(endpoints_reservation::list_reservations)
        .service(endpoints_reservation::change_time_slot)
        .service(endpoints_reservation::cancel_reservation)
        .service(endpoints_reservation::reservation_qr_code)
        .service(endpoints_scan::record_scan)
        .service(endpoints_admin::login)
        .service(endpoints_admin::logout)
        .service(endpoints_admin::check_session)
        .service(endpoints_admin::list_reservations)
        .service(endpoints_admin::list_scans)
}

#[derive(Debug)]
pub enum APIError {
    NotExisting,
    Conflict(ConflictField),
    NoSessionToken,
    InvalidSessionToken(SessionError),
    AuthenticationFailed,
    PermissionDenied,
    InvalidJson(actix_web::error::JsonPayloadError),
    InvalidQuery(actix_web::error::QueryPayloadError),
    InvalidData(String),
    StoreUnavailable(String),
    InternalError(String),
}

impl Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExisting => f.write_str("Reservation not found")?,
            Self::Conflict(field) => f.write_str(field.message())?,
            Self::NoSessionToken => {
                f.write_str("This action requires admin authentication, but client did not send a session token.")?
            },
            Self::InvalidSessionToken(_) => {
                f.write_str("This action requires admin authentication, but the session token given by the client is not valid.")?
            },
            Self::AuthenticationFailed => f.write_str("Invalid email or password")?,
            Self::PermissionDenied => {
                f.write_str("Client is not authorized to perform this action. Admin authentication is required.")?
            },
            Self::InvalidJson(e) => {
                write!(f, "Invalid JSON request data: {}", e)?;
            },
            Self::InvalidQuery(e) => {
                write!(f, "Invalid query parameters: {}", e)?;
            },
            Self::InvalidData(e) => f.write_str(e)?,
            Self::StoreUnavailable(_) => f.write_str("Database is currently unavailable. Please try again later.")?,
            Self::InternalError(_) => f.write_str("Internal server error")?,
        };
        Ok(())
    }
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse {
        let message = format!("{}", self);
        let mut body = json!({
            "httpCode": self.status_code().as_u16(),
            "message": message
        });
        if let Self::Conflict(field) = self {
            body["field"] = json!(field.name());
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotExisting => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NoSessionToken => StatusCode::UNAUTHORIZED,
            Self::InvalidSessionToken(_) => StatusCode::UNAUTHORIZED,
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::UNAUTHORIZED,
            Self::InvalidJson(e) => match e {
                JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::InvalidData(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BookingError> for APIError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Validation(message) => Self::InvalidData(message),
            BookingError::Conflict(field) => Self::Conflict(field),
            BookingError::NotFound => Self::NotExisting,
            BookingError::StoreUnavailable(e) => Self::StoreUnavailable(e),
            BookingError::Unexpected(e) => Self::InternalError(e),
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::PermissionDenied => Self::PermissionDenied,
            e => BookingError::from(e).into(),
        }
    }
}

impl From<actix_web::error::BlockingError> for APIError {
    fn from(_e: actix_web::error::BlockingError) -> Self {
        APIError::InternalError(
            "Could not get thread from thread pool for synchronous database operation.".to_owned(),
        )
    }
}

impl From<SessionError> for APIError {
    fn from(e: SessionError) -> Self {
        APIError::InvalidSessionToken(e)
    }
}

/// Parse the station number from the URL path. Unknown stations don't exist as resources.
fn parse_station(value: i16) -> Result<Station, APIError> {
    Station::try_from(value).map_err(|_| APIError::NotExisting)
}

/// Get the admin session token of the client, from the `X-SESSION-TOKEN` header or (if not
/// present) from the session cookie, and validate it.
fn extract_session_token(
    state: &AppState,
    request: &HttpRequest,
    session_token_header: Option<web::Header<SessionTokenHeader>>,
) -> Result<SessionToken, APIError> {
    let raw_token = match session_token_header {
        Some(header) => header.into_inner().0,
        None => request
            .cookie(SESSION_COOKIE_NAME)
            .ok_or(APIError::NoSessionToken)?
            .value()
            .to_owned(),
    };
    Ok(SessionToken::from_string(
        &raw_token,
        &state.secret,
        state.session_max_age,
    )?)
}

struct SessionTokenHeader(String);

impl actix_web::http::header::TryIntoHeaderValue for SessionTokenHeader {
    type Error = actix_web::http::header::InvalidHeaderValue;

    fn try_into_value(self) -> Result<actix_web::http::header::HeaderValue, Self::Error> {
        self.0.parse()
    }
}

impl actix_web::http::header::Header for SessionTokenHeader {
    fn name() -> actix_web::http::header::HeaderName {
        actix_web::http::header::HeaderName::from_static("x-session-token")
    }

    fn parse<M: actix_web::HttpMessage>(msg: &M) -> Result<Self, actix_web::error::ParseError> {
        Ok(Self(
            msg.headers()
                .get(Self::name())
                .ok_or(actix_web::error::ParseError::Header)?
                .to_str()
                .unwrap_or("")
                .to_owned(),
        ))
    }
}
