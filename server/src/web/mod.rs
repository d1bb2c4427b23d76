use crate::cli_error::CliError;
use crate::data_store::get_store;
use crate::setup::{DatabaseConfig, ServerConfig};
use actix_web::{middleware, web, App, HttpServer};
use log::info;
use std::sync::Arc;

mod api;
mod http_error_logging;

pub fn serve(server_config: ServerConfig, database_config: DatabaseConfig) -> Result<(), CliError> {
    let listen_address = (
        server_config.listen_address.clone(),
        server_config.listen_port,
    );
    let state = AppState::new(server_config, &database_config)?;
    info!(
        "Starting web server at {}:{}",
        listen_address.0, listen_address.1
    );
    actix_web::rt::System::new()
        .block_on(
            HttpServer::new(move || {
                App::new()
                    .configure(api::configure_app)
                    .app_data(web::Data::new(state.clone()))
                    .wrap(middleware::from_fn(
                        http_error_logging::error_logging_middleware,
                    ))
                    .wrap(middleware::Compress::default())
                    .wrap(middleware::Logger::default())
            })
            .bind(listen_address)
            .map_err(CliError::BindError)?
            .run(),
        )
        .map_err(CliError::ServerError)
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn crate::data_store::OpenHouseStore>,
    secret: String,
    session_max_age: std::time::Duration,
}

impl AppState {
    pub fn new(
        server_config: ServerConfig,
        database_config: &DatabaseConfig,
    ) -> Result<Self, CliError> {
        Ok(Self {
            store: Arc::new(get_store(&database_config.database_url)?),
            secret: server_config.secret,
            session_max_age: server_config.session_max_age,
        })
    }
}
