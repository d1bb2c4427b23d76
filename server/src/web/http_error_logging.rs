use crate::web::api::APIError;
use log::{error, warn};

pub async fn error_logging_middleware<B: actix_web::body::MessageBody>(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<B>,
) -> Result<actix_web::dev::ServiceResponse<B>, actix_web::Error> {
    let response = next.call(req).await?;

    if let Some(error) = response.response().error() {
        let client = response
            .request()
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned();
        if let Some(api_error) = error.as_error::<APIError>() {
            match api_error {
                APIError::NoSessionToken | APIError::PermissionDenied => {
                    warn!(
                        "HTTP {} permission denied at <{}>. Client: <{}> Cause: {}",
                        response.response().status(),
                        response.request().uri(),
                        client,
                        api_error
                    );
                }
                APIError::InvalidSessionToken(session_error) => {
                    warn!(
                        "HTTP {} invalid session token. Client: <{}> Cause: {}",
                        response.response().status(),
                        client,
                        session_error
                    );
                }
                APIError::AuthenticationFailed => {
                    warn!(
                        "HTTP {} admin authentication failed. Client: <{}>",
                        response.response().status(),
                        client,
                    );
                }
                APIError::NotExisting => {
                    warn!(
                        "HTTP {} not found at <{}>",
                        response.response().status(),
                        response.request().uri()
                    );
                }
                APIError::Conflict(_)
                | APIError::InvalidJson(_)
                | APIError::InvalidQuery(_)
                | APIError::InvalidData(_) => {
                    warn!(
                        "HTTP {} invalid data at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        api_error
                    );
                }
                APIError::StoreUnavailable(e) => {
                    error!(
                        "HTTP {} database unavailable at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
                APIError::InternalError(e) => {
                    error!(
                        "HTTP {} internal server error at <{}>: {}",
                        response.response().status(),
                        response.request().uri(),
                        e
                    );
                }
            }
        } else {
            error!(
                "HTTP {} unexpected error at <{}>: {:?}",
                response.response().status(),
                response.request().uri(),
                error
            );
        }
    }
    Ok(response)
}
