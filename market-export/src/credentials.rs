use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::CredentialError;

/// Environment variable holding the Discord bot token.
pub const TOKEN_ENV_VAR: &str = "DISCORD_BOT_TOKEN";

/// Credential for resolving Discord message links.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatCredentials {
    bot_token: String,
}

impl ChatCredentials {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
        }
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    /// The token with everything but the last four characters hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.bot_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }

    /// Load the token from, in priority order: the explicit flag value, the
    /// `DISCORD_BOT_TOKEN` environment variable, the config file.
    ///
    /// A token that is set nowhere is not an error; Discord links then fail
    /// per row.
    pub fn load(flag: Option<&str>) -> Result<(Option<Self>, CredentialSource), CredentialError> {
        let env = std::env::var(TOKEN_ENV_VAR).ok();
        let path = config_path();
        resolve_token(flag, env.as_deref(), path.as_deref())
    }
}

impl fmt::Debug for ChatCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCredentials")
            .field("bot_token", &self.masked())
            .finish()
    }
}

/// Where the bot token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize)]
struct ConfigFile {
    discord: Option<DiscordConfig>,
}

#[derive(Debug, serde::Deserialize)]
struct DiscordConfig {
    bot_token: Option<String>,
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cabinet-market").join("credentials.toml"))
}

/// Pick the first non-blank token among the candidates.
fn resolve_token(
    flag: Option<&str>,
    env: Option<&str>,
    config: Option<&Path>,
) -> Result<(Option<ChatCredentials>, CredentialSource), CredentialError> {
    let non_blank = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

    if let Some(token) = non_blank(flag) {
        return Ok((Some(ChatCredentials::new(token)), CredentialSource::Flag));
    }
    if let Some(token) = non_blank(env) {
        return Ok((
            Some(ChatCredentials::new(token)),
            CredentialSource::EnvVar(TOKEN_ENV_VAR),
        ));
    }
    if let Some(path) = config {
        let from_file = load_config_file(path)?;
        if let Some(token) = non_blank(from_file.as_deref()) {
            return Ok((Some(ChatCredentials::new(token)), CredentialSource::ConfigFile));
        }
    }
    Ok((None, CredentialSource::Missing))
}

/// Read `discord.bot_token` from the config file. A missing file is `None`.
fn load_config_file(path: &Path) -> Result<Option<String>, CredentialError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CredentialError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: ConfigFile = toml::from_str(&content).map_err(|e| CredentialError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(config.discord.and_then(|d| d.bot_token))
}
