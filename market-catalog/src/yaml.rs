//! YAML loading for the marketplace catalog config.
//!
//! The config is a single document with a top-level `marketplace` key
//! holding a list of catalog entries:
//!
//! ```yaml
//! marketplace:
//!   - CatalogName: Arcade Classics
//!     Description: Community arcade cabinets
//!     Url: https://example.com/arcade.csv
//! ```

use crate::types::CatalogEntry;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("{path} is missing the top-level 'marketplace' key")]
    MissingMarketplace { path: String },
    #[error("'marketplace' key in {path} does not contain a list")]
    NotAList { path: String },
    #[error("Invalid catalog entry {index} in {path}: {source}")]
    Entry {
        path: String,
        index: usize,
        source: serde_yml::Error,
    },
}

/// Load all catalog entries from a marketplace config file.
pub fn load_marketplace(path: &Path) -> Result<Vec<CatalogEntry>, YamlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_marketplace(&contents, &path.display().to_string())
}

/// Parse a marketplace config from a string. `origin` is used in error messages.
pub fn parse_marketplace(contents: &str, origin: &str) -> Result<Vec<CatalogEntry>, YamlError> {
    let doc: serde_yml::Value = serde_yml::from_str(contents).map_err(|e| YamlError::Parse {
        path: origin.to_string(),
        source: e,
    })?;

    let list = match doc.get("marketplace") {
        None | Some(serde_yml::Value::Null) => {
            return Err(YamlError::MissingMarketplace {
                path: origin.to_string(),
            });
        }
        Some(serde_yml::Value::Sequence(seq)) => seq,
        Some(_) => {
            return Err(YamlError::NotAList {
                path: origin.to_string(),
            });
        }
    };

    list.iter()
        .enumerate()
        .map(|(i, item)| {
            serde_yml::from_value::<CatalogEntry>(item.clone()).map_err(|e| YamlError::Entry {
                path: origin.to_string(),
                index: i + 1,
                source: e,
            })
        })
        .collect()
}
