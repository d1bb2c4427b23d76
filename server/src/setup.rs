use std::env;
use std::env::VarError;
use std::fmt::{Display, Formatter};

const DEFAULT_SESSION_MAX_AGE_HOURS: u64 = 12;
const MAX_SESSION_MAX_AGE_HOURS: u64 = 8760;

/// Settings of the database connection, taken from the environment
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection url, "postgres://{user}:{password}@{host}/{database}"
    pub database_url: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, SetupError> {
        Ok(Self {
            database_url: get_env_variable("DATABASE_URL")?,
        })
    }
}

/// Settings of the web server, taken from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    /// Cryptographic application secret for signing admin session tokens
    pub secret: String,
    /// Lifetime of admin sessions
    pub session_max_age: std::time::Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, SetupError> {
        let secret = get_env_variable("SECRET")?;
        if secret.len() < 16 {
            return Err(SetupError::EnvVariableInvalid {
                variable_name: "SECRET",
                problem: "Must be at least 16 characters long",
            });
        }
        Ok(Self {
            listen_address: get_env_variable("LISTEN_ADDRESS")?,
            listen_port: get_env_variable("LISTEN_PORT")?.parse().map_err(|_| {
                SetupError::EnvVariableInvalid {
                    variable_name: "LISTEN_PORT",
                    problem: "Not a valid uint16",
                }
            })?,
            secret,
            session_max_age: get_session_max_age_from_env()?,
        })
    }
}

fn get_env_variable(variable_name: &'static str) -> Result<String, SetupError> {
    env::var(variable_name).map_err(|e| SetupError::from_env_error(e, variable_name))
}

/// Get the lifetime of admin sessions (in hours) from the environment variable. Defaults to 12
/// hours if not set.
fn get_session_max_age_from_env() -> Result<std::time::Duration, SetupError> {
    match env::var("SESSION_MAX_AGE_HOURS") {
        Err(VarError::NotPresent) => Ok(std::time::Duration::from_secs(
            DEFAULT_SESSION_MAX_AGE_HOURS * 3600,
        )),
        Err(e) => Err(SetupError::from_env_error(e, "SESSION_MAX_AGE_HOURS")),
        Ok(v) => parse_session_max_age_hours(&v),
    }
}

fn parse_session_max_age_hours(value: &str) -> Result<std::time::Duration, SetupError> {
    let hours = value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|hours| (1..=MAX_SESSION_MAX_AGE_HOURS).contains(hours))
        .ok_or(SetupError::EnvVariableInvalid {
            variable_name: "SESSION_MAX_AGE_HOURS",
            problem: "Not an integer between 1 and 8760 (one year)",
        })?;
    Ok(std::time::Duration::from_secs(hours * 3600))
}

#[derive(Debug)]
pub enum SetupError {
    EnvVariableMissing {
        variable_name: &'static str,
    },
    EnvVariableInvalid {
        variable_name: &'static str,
        problem: &'static str,
    },
}

impl SetupError {
    fn from_env_error(error: VarError, variable_name: &'static str) -> Self {
        match error {
            VarError::NotPresent => Self::EnvVariableMissing { variable_name },
            VarError::NotUnicode(_) => Self::EnvVariableInvalid {
                variable_name,
                problem: "no valid unicode",
            },
        }
    }
}

impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::EnvVariableMissing { variable_name } => {
                write!(f, "Environment variable {} must be defined", variable_name)
            }
            SetupError::EnvVariableInvalid {
                variable_name,
                problem,
            } => write!(
                f,
                "Value of environment variable {} is invalid: {}",
                variable_name, problem
            ),
        }
    }
}

impl std::error::Error for SetupError {}
