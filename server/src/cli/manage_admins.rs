use crate::booking::validation::validate_email;
use crate::cli::util::{query_user_and_check, query_user_bool};
use crate::cli::CliAuthTokenKey;
use crate::cli_error::CliError;
use crate::data_store::auth_token::AdminToken;
use crate::data_store::models::NewAdmin;
use crate::data_store::{get_store, password, AdminId, OpenHouseStore};
use crate::setup::DatabaseConfig;
use log::info;

const MIN_PASSWORD_LENGTH: usize = 8;

pub fn print_admin_list(config: &DatabaseConfig) -> Result<(), CliError> {
    let data_store_pool = get_store(&config.database_url)?;
    let mut data_store = data_store_pool.get_facade()?;

    let auth_key = CliAuthTokenKey::new();
    let auth_token = AdminToken::create_for_cli(&auth_key);
    let admins = data_store.get_admins(&auth_token)?;

    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_header(vec!["id", "email"])
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
        .add_rows(
            admins
                .into_iter()
                .map(|admin| [admin.id.to_string(), admin.email]),
        );

    println!("Admin accounts:");
    println!("{table}");
    Ok(())
}

pub fn add_admin(config: &DatabaseConfig) -> Result<(), CliError> {
    let data_store_pool = get_store(&config.database_url)?;
    let mut data_store = data_store_pool.get_facade()?;

    let email: String = query_user_and_check("Enter email address of the new admin", |value: &String| {
        validate_email(value).map(|_| ())
    });
    // Checked above, so this can't fail
    let email = validate_email(&email).map_err(|e| CliError::DataError(e.to_string()))?;
    let the_password: String = query_user_and_check("Enter password", |value: &String| {
        if value.chars().count() < MIN_PASSWORD_LENGTH {
            Err(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ))
        } else {
            Ok(())
        }
    });
    let password_hash =
        password::hash_password(&the_password).map_err(|e| CliError::DataError(e.to_string()))?;

    let auth_key = CliAuthTokenKey::new();
    let auth_token = AdminToken::create_for_cli(&auth_key);
    let admin_id = data_store.create_admin(
        &auth_token,
        NewAdmin {
            email: email.clone(),
            password_hash,
        },
    )?;
    info!("Created admin account {} ({})", admin_id, email);
    println!("Created admin account with id {}.", admin_id);
    Ok(())
}

pub fn delete_admin(config: &DatabaseConfig, admin_id: AdminId) -> Result<(), CliError> {
    let data_store_pool = get_store(&config.database_url)?;
    let mut data_store = data_store_pool.get_facade()?;

    let auth_key = CliAuthTokenKey::new();
    let auth_token = AdminToken::create_for_cli(&auth_key);
    let admin = data_store
        .get_admins(&auth_token)?
        .into_iter()
        .find(|a| a.id == admin_id)
        .ok_or(CliError::DataError(format!(
            "Admin account with id {} does not exist",
            admin_id
        )))?;

    if !query_user_bool(
        &format!("Delete admin account {} ({})?", admin.id, admin.email),
        Some(false),
    ) {
        println!("Aborted.");
        return Ok(());
    }
    data_store.delete_admin(&auth_token, admin_id)?;
    info!("Deleted admin account {} ({})", admin.id, admin.email);
    println!("Deleted admin account {}.", admin_id);
    Ok(())
}
