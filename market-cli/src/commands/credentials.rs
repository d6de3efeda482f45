use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use market_export::ChatCredentials;

use crate::CliError;

/// Show the Discord bot token (masked) and where it comes from.
pub(crate) fn run_credentials_show() -> Result<(), CliError> {
    let path = market_export::config_path();

    log::info!(
        "{}",
        "Discord Credentials".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    let (credentials, source) =
        ChatCredentials::load(None).map_err(|e| CliError::config(e.to_string()))?;
    match (credentials, source) {
        (Some(creds), source) => {
            log::info!(
                "  bot_token: {} {}",
                creds.masked(),
                format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        (None, _) => {
            log::info!(
                "  bot_token: {}",
                "not set".if_supports_color(Stdout, |t| t.yellow()),
            );
            crate::log_blank();
            log::info!(
                "Set ${} or add a [discord] bot_token entry to the config file.",
                market_export::TOKEN_ENV_VAR,
            );
        }
    }

    Ok(())
}

/// Print the credentials file path.
pub(crate) fn run_credentials_path() -> Result<(), CliError> {
    let path = market_export::config_path()
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    log::info!("{}", path.display());
    Ok(())
}
