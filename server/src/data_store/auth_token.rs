use crate::cli::CliAuthTokenKey;
use crate::data_store::AdminId;

/// Authorization token for the admin-only functions of the data_store
///
/// This structure is our main protection against accidental unauthorized-access bugs: All
/// admin-only data_store functions require an AdminToken. An AdminToken can only be created by
/// [crate::data_store::OpenHouseStoreFacade::get_admin_token_for_session], after checking that the
/// admin account referenced by the client's session still exists, and by cli functions via
/// [AdminToken::create_for_cli].
pub struct AdminToken {
    admin_id: Option<AdminId>,
    email: String,
}

impl AdminToken {
    /// Create a new AdminToken for a client session.
    ///
    /// This function must only be used by implementations of
    /// [crate::data_store::OpenHouseStoreFacade::get_admin_token_for_session] after checking the
    /// validity of the session's admin id!
    pub(super) fn create_for_session(admin_id: AdminId, email: String) -> Self {
        AdminToken {
            admin_id: Some(admin_id),
            email,
        }
    }

    /// Create a new AdminToken for a command line interface functionality.
    ///
    /// This function must only be used by command line interface functions, not in the context of
    /// the web server!
    pub fn create_for_cli(_key: &CliAuthTokenKey) -> Self {
        AdminToken {
            admin_id: None,
            email: "(command line)".to_owned(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Display for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.admin_id {
            Some(admin_id) => write!(f, "admin {} (id {})", self.email, admin_id),
            None => f.write_str(&self.email),
        }
    }
}
