//! Resolving Discord message links to attachment URLs.
//!
//! A message link looks like
//! `https://discord.com/channels/<guild or @me>/<channel>/<message>`. The
//! message is fetched from the REST API and one of its attachments picked.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::credentials::ChatCredentials;
use crate::error::ResolveError;

/// Default Discord REST API base.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v9";

/// Timeout for a single Discord API call.
pub const CHAT_API_TIMEOUT: Duration = Duration::from_secs(10);

static CHAT_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"channels/(\d+|@me)/(\d+)/(\d+)").unwrap());

/// The ids carried by a Discord message link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLink {
    pub guild: String,
    pub channel: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    attachments: Vec<Attachment>,
}

/// One attachment of a Discord message, as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Whether a URL points at a Discord message.
pub fn is_chat_link(url: &str) -> bool {
    url.contains("discord.com/channels") || url.contains("discordapp.com/channels")
}

/// Extract guild, channel and message ids from a message link.
pub fn parse_chat_link(url: &str) -> Option<ChatLink> {
    let caps = CHAT_LINK_REGEX.captures(url)?;
    Some(ChatLink {
        guild: caps[1].to_string(),
        channel: caps[2].to_string(),
        message: caps[3].to_string(),
    })
}

/// Pick the attachment to download.
///
/// The first `.zip` attachment wins regardless of position; otherwise the
/// first attachment that has a URL.
pub fn select_attachment(attachments: &[Attachment]) -> Result<&str, ResolveError> {
    if attachments.is_empty() {
        return Err(ResolveError::NoAttachments);
    }

    let zip = attachments.iter().find_map(|a| {
        let is_zip = a
            .filename
            .as_deref()
            .is_some_and(|f| f.to_ascii_lowercase().ends_with(".zip"));
        if is_zip { a.url.as_deref() } else { None }
    });
    if let Some(url) = zip {
        return Ok(url);
    }

    let first = attachments
        .iter()
        .find_map(|a| a.url.as_deref())
        .ok_or(ResolveError::NoAttachmentUrl)?;
    log::warn!("No .zip attachment found, using first attachment: {}", first);
    Ok(first)
}

/// Blocking client for the message endpoint of the Discord API.
pub struct DiscordClient {
    http: reqwest::blocking::Client,
    api_base: String,
    credentials: Option<ChatCredentials>,
}

impl DiscordClient {
    pub fn new(credentials: Option<ChatCredentials>) -> Result<Self, reqwest::Error> {
        Self::with_api_base(credentials, DISCORD_API_BASE)
    }

    /// Client talking to a different API base, such as a local mock server.
    pub fn with_api_base(
        credentials: Option<ChatCredentials>,
        api_base: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(CHAT_API_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Resolve a message link to the URL of its chosen attachment.
    pub fn resolve(&self, link_url: &str) -> Result<String, ResolveError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(ResolveError::MissingCredential)?;
        let link = parse_chat_link(link_url)
            .ok_or_else(|| ResolveError::InvalidChatLink(link_url.to_string()))?;

        let attachments = self.fetch_attachments(creds, &link)?;
        select_attachment(&attachments).map(str::to_string)
    }

    fn fetch_attachments(
        &self,
        creds: &ChatCredentials,
        link: &ChatLink,
    ) -> Result<Vec<Attachment>, ResolveError> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.api_base, link.channel, link.message
        );
        log::debug!("Fetching Discord message {}", url);

        let resp = self
            .http
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bot {}", creds.bot_token()),
            )
            .send()
            .map_err(network_error)?;

        let status = resp.status();
        let text = resp.text().map_err(network_error)?;
        if !status.is_success() {
            return Err(ResolveError::Http {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        let message: Message = serde_json::from_str(&text)
            .map_err(|e| ResolveError::MalformedPayload(e.to_string()))?;
        Ok(message.attachments)
    }
}

fn network_error(e: reqwest::Error) -> ResolveError {
    if e.is_timeout() {
        ResolveError::Timeout
    } else {
        ResolveError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(filename: &str, url: Option<&str>) -> Attachment {
        Attachment {
            filename: Some(filename.to_string()),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn detects_both_domains() {
        assert!(is_chat_link("https://discord.com/channels/1/2/3"));
        assert!(is_chat_link("https://discordapp.com/channels/1/2/3"));
        assert!(!is_chat_link("https://discord.gg/invite"));
    }

    #[test]
    fn parses_guild_and_dm_links() {
        let link = parse_chat_link("https://discord.com/channels/111/222/333").unwrap();
        assert_eq!(link.guild, "111");
        assert_eq!(link.channel, "222");
        assert_eq!(link.message, "333");

        let dm = parse_chat_link("https://discord.com/channels/@me/222/333").unwrap();
        assert_eq!(dm.guild, "@me");
    }

    #[test]
    fn rejects_incomplete_links() {
        assert_eq!(parse_chat_link("https://discord.com/channels/111/222"), None);
    }

    #[test]
    fn zip_attachment_wins_regardless_of_position() {
        let list = vec![
            attachment("preview.png", Some("https://cdn/preview.png")),
            attachment("Cabinet.ZIP", Some("https://cdn/cabinet.zip")),
        ];
        assert_eq!(select_attachment(&list).unwrap(), "https://cdn/cabinet.zip");
    }

    #[test]
    fn falls_back_to_first_attachment_with_url() {
        let list = vec![
            attachment("broken.bin", None),
            attachment("readme.txt", Some("https://cdn/readme.txt")),
            attachment("other.txt", Some("https://cdn/other.txt")),
        ];
        assert_eq!(select_attachment(&list).unwrap(), "https://cdn/readme.txt");
    }

    #[test]
    fn zip_without_url_is_passed_over() {
        let list = vec![
            attachment("cabinet.zip", None),
            attachment("readme.txt", Some("https://cdn/readme.txt")),
        ];
        assert_eq!(select_attachment(&list).unwrap(), "https://cdn/readme.txt");
    }

    #[test]
    fn empty_and_urlless_attachments_fail() {
        assert!(matches!(select_attachment(&[]), Err(ResolveError::NoAttachments)));
        let list = vec![attachment("a.zip", None)];
        assert!(matches!(
            select_attachment(&list),
            Err(ResolveError::NoAttachmentUrl)
        ));
    }

    #[test]
    fn missing_token_fails_before_any_request() {
        let client = DiscordClient::with_api_base(None, "http://127.0.0.1:9").unwrap();
        let err = client
            .resolve("https://discord.com/channels/1/2/3")
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingCredential));
    }
}
