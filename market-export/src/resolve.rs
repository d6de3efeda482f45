use crate::discord::{self, DiscordClient};
use crate::drive;
use crate::error::ResolveError;

/// How a link was turned into its download URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Used as-is.
    Direct,
    /// Attachment of a Discord message.
    ChatAttachment,
    /// Google Drive share link rewritten to a direct download.
    DriveShare,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::ChatAttachment => write!(f, "Discord attachment"),
            Self::DriveShare => write!(f, "Google Drive"),
        }
    }
}

/// A URL ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
    pub kind: LinkKind,
}

/// Turns spreadsheet links into downloadable URLs.
pub struct LinkResolver {
    discord: DiscordClient,
}

impl LinkResolver {
    pub fn new(discord: DiscordClient) -> Self {
        Self { discord }
    }

    pub fn resolve(&self, url: &str) -> Result<ResolvedLink, ResolveError> {
        if discord::is_chat_link(url) {
            log::debug!("Resolving Discord link: {}", url);
            let resolved = self.discord.resolve(url)?;
            return Ok(ResolvedLink {
                url: resolved,
                kind: LinkKind::ChatAttachment,
            });
        }

        if drive::is_drive_link(url) {
            log::debug!("Resolving Google Drive link: {}", url);
            return Ok(ResolvedLink {
                url: drive::direct_download_url(url)?,
                kind: LinkKind::DriveShare,
            });
        }

        Ok(ResolvedLink {
            url: url.to_string(),
            kind: LinkKind::Direct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LinkResolver {
        LinkResolver::new(DiscordClient::with_api_base(None, "http://127.0.0.1:9").unwrap())
    }

    #[test]
    fn plain_urls_pass_through() {
        let link = resolver().resolve("https://files.example/galaga.zip").unwrap();
        assert_eq!(link.url, "https://files.example/galaga.zip");
        assert_eq!(link.kind, LinkKind::Direct);
    }

    #[test]
    fn drive_links_are_rewritten() {
        let link = resolver()
            .resolve("https://drive.google.com/file/d/1AbCdEfGhIjKlMnOpQrStUvWxYz/view")
            .unwrap();
        assert_eq!(
            link.url,
            "https://drive.google.com/uc?export=download&id=1AbCdEfGhIjKlMnOpQrStUvWxYz"
        );
        assert_eq!(link.kind, LinkKind::DriveShare);
    }

    #[test]
    fn discord_links_need_a_token() {
        let err = resolver()
            .resolve("https://discord.com/channels/@me/2/3")
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingCredential));
    }
}
