//! Configuration fallback for key material.
//!
//! A TOML file carries an `[encrypt]` table with `key` and
//! `associated_data` string fields. The file is read only when the
//! caller did not supply both values explicitly; a missing or malformed
//! file is then fatal, since there is nothing left to fall back to.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Name of the required table inside the config file.
pub const CONFIG_SECTION: &str = "encrypt";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config file `{path}`: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    /// Config file is not well-formed TOML.
    #[error("config file `{path}` is not well-formed: {source}")]
    Malformed {
        path: String,
        source: toml::de::Error,
    },

    /// Required `[encrypt]` table is absent.
    #[error("config file `{path}` has no `[{CONFIG_SECTION}]` section")]
    MissingSection { path: String },

    /// A required field is absent both explicitly and in the config file.
    #[error("no `{field}` value: not passed explicitly and absent from config")]
    MissingField { field: &'static str },
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    encrypt: Option<EncryptSection>,
}

/// The `[encrypt]` table. Either field may be omitted when the caller
/// provides the value explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct EncryptSection {
    pub key: Option<String>,
    pub associated_data: Option<String>,
}

/// Read and parse the `[encrypt]` section of `path`.
pub fn load_encrypt_section(path: &Path) -> Result<EncryptSection, ConfigError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: display.clone(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&raw).map_err(|source| ConfigError::Malformed {
        path: display.clone(),
        source,
    })?;
    parsed
        .encrypt
        .ok_or(ConfigError::MissingSection { path: display })
}
