//! cabinet-market CLI
//!
//! Builds the cabinet marketplace database from catalog YAML and remote
//! cabinet indexes, and exports spreadsheet-listed cabinets to a TSV index.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands, CredentialsAction};
use commands::build_info::run_build_info;
use commands::create_db::run_create_db;
use commands::credentials::{run_credentials_path, run_credentials_show};
use commands::export::run_export;
use commands::load_cabinets::run_load_cabinets;
use commands::load_catalogs::run_load_catalogs;

pub(crate) use error::CliError;

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::CreateDb { db_path } => run_create_db(&db_path),
        Commands::LoadCatalogs { db_path, yaml_path } => run_load_catalogs(&db_path, &yaml_path),
        Commands::LoadCabinets { db_path } => run_load_cabinets(&db_path),
        Commands::Export {
            input,
            output,
            download_dir,
            discord_token,
        } => run_export(input, output, download_dir, discord_token.as_deref()),
        Commands::BuildInfo {
            db_path,
            tag,
            commit_sha,
            timestamp,
        } => run_build_info(&db_path, &tag, &commit_sha, &timestamp),
        Commands::Credentials { action } => match action {
            CredentialsAction::Show => run_credentials_show(),
            CredentialsAction::Path => run_credentials_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
