//! Implementation of the command line functions besides `serve`: database migration, management
//! of admin accounts and plain-text reports of the stored data.

pub mod database_migration;
pub mod manage_admins;
pub mod reports;
mod util;

/// Key for creating [crate::data_store::auth_token::AdminToken]s for command line functions.
///
/// It can only be created within the cli module, so web code can't create AdminTokens without an
/// authenticated session.
pub struct CliAuthTokenKey {
    _private: (),
}

impl CliAuthTokenKey {
    #[allow(clippy::new_without_default)] // We always want to explicitly create these objects
    pub fn new() -> Self {
        Self { _private: () }
    }
}
