use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use log::{error, warn};
use openhouse_server::booking::Station;
use openhouse_server::cli::{database_migration, manage_admins, reports};
use openhouse_server::cli_error::CliError;
use openhouse_server::setup::{DatabaseConfig, ServerConfig};

fn main() {
    let args = CliArgs::parse();
    let dotenv_result = dotenv();

    let env = env_logger::Env::new().filter_or(
        "RUST_LOG",
        match args.global_opts.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    );
    env_logger::Builder::from_env(env).init();
    if let Err(e) = dotenv_result {
        warn!("Could not read .env file: {}", e);
    }

    if let Err(e) = run(args.command) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(command: Command) -> Result<(), CliError> {
    let database_config = DatabaseConfig::from_env()?;
    match command {
        Command::Serve => {
            let server_config = ServerConfig::from_env()?;
            database_migration::check_migration_state(&database_config)?;
            openhouse_server::web::serve(server_config, database_config)
        }
        Command::MigrateDatabase => database_migration::run_migrations(&database_config),
        Command::AddAdmin => manage_admins::add_admin(&database_config),
        Command::ListAdmins => manage_admins::print_admin_list(&database_config),
        Command::DeleteAdmin { admin_id } => {
            manage_admins::delete_admin(&database_config, admin_id)
        }
        Command::ListReservations { station } => {
            reports::print_reservation_list(&database_config, station)
        }
        Command::ListScans { station } => reports::print_scan_list(&database_config, station),
    }
}

fn parse_station(value: &str) -> Result<Station, String> {
    let number: i16 = value.parse().map_err(|e| format!("{}", e))?;
    Station::try_from(number).map_err(|e| e.to_string())
}

/// Reservation backend for the two stations of the open house event
#[derive(Debug, Parser)]
#[clap(name = "openhouse_server", version)]
pub struct CliArgs {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the reservation API
    Serve,
    /// Migrate the database schema to the current version
    MigrateDatabase,
    /// Create a new admin account (interactively)
    AddAdmin,
    /// List all admin accounts
    ListAdmins,
    /// Delete an admin account
    DeleteAdmin {
        /// Id of the admin account, as shown by list-admins
        admin_id: i32,
    },
    /// Print all reservations and the reservation statistics
    ListReservations {
        /// Only list reservations of this station (1 or 2)
        #[clap(long, value_parser = parse_station)]
        station: Option<Station>,
    },
    /// Print the attendance log
    ListScans {
        /// Only list scans of this station (1 or 2)
        #[clap(long, value_parser = parse_station)]
        station: Option<Station>,
    },
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Verbosity level (can be specified multiple times)
    #[clap(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}
