//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cabinet-market")]
#[command(about = "Build the cabinet marketplace database and export cabinet indexes", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the marketplace database (or verify an existing one)
    CreateDb {
        /// Path to the SQLite database file
        #[arg(long)]
        db_path: PathBuf,
    },

    /// Replace all catalogs with the entries of a marketplace YAML file
    LoadCatalogs {
        /// Path to the SQLite database file
        #[arg(long)]
        db_path: PathBuf,

        /// Path to the YAML file listing the catalogs
        #[arg(long)]
        yaml_path: PathBuf,
    },

    /// Download every catalog's cabinet index and load its cabinets
    LoadCabinets {
        /// Path to the SQLite database file
        #[arg(long)]
        db_path: PathBuf,
    },

    /// Download the cabinets listed in a spreadsheet and write a TSV index
    Export {
        /// Spreadsheet (.xlsx) with one cabinet per row
        #[arg(short, long)]
        input: PathBuf,

        /// TSV index to write
        #[arg(short, long)]
        output: PathBuf,

        /// Directory downloaded files are saved to
        #[arg(long)]
        download_dir: PathBuf,

        /// Discord bot token for message links (overrides env var and config file)
        #[arg(long)]
        discord_token: Option<String>,
    },

    /// Stamp release build information into the database
    BuildInfo {
        /// Path to the SQLite database file
        #[arg(long)]
        db_path: PathBuf,

        /// Release tag (e.g. v2.3.1); only the major version is stored
        #[arg(long)]
        tag: String,

        /// Commit SHA of the build
        #[arg(long)]
        commit_sha: String,

        /// UTC build timestamp (RFC 3339)
        #[arg(long)]
        timestamp: String,
    },

    /// Manage the Discord bot token used by export
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CredentialsAction {
    /// Show the current token (masked) and where it comes from
    Show,

    /// Print the credentials file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_export_with_global_flags() {
        let cli = Cli::try_parse_from([
            "cabinet-market",
            "export",
            "--input",
            "in.xlsx",
            "--output",
            "out.tsv",
            "--download-dir",
            "dl",
            "--quiet",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Export {
                input,
                discord_token,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.xlsx"));
                assert_eq!(discord_token, None);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn build_info_requires_every_field() {
        let result = Cli::try_parse_from([
            "cabinet-market",
            "build-info",
            "--db-path",
            "market.db",
            "--tag",
            "v1.2",
        ]);
        assert!(result.is_err());
    }
}
