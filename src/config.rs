//! Server configuration from environment variables.
//!
//! - `HOST` (default `0.0.0.0`) and `PORT` (default `8080`): listen address.
//! - `DATA_FILE`: optional JSON snapshot path; when set the store is loaded from and saved to it.
//! - `SESSION_KEY`: optional cookie signing key, at least 64 bytes. A random key is used otherwise,
//!   which logs everyone out on restart.

use std::path::PathBuf;

/// Minimum length of `SESSION_KEY`.
pub const SESSION_KEY_MIN_LEN: usize = 64;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
    pub session_key: Option<Vec<u8>>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: None,
            session_key: None,
        }
    }
}

impl ServerConfig {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup. Unparseable or empty values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(p) => p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{}', using {}", p, default_port());
                default_port()
            }),
            None => default_port(),
        };

        let session_key = non_empty("SESSION_KEY").and_then(|key| {
            if key.len() >= SESSION_KEY_MIN_LEN {
                Some(key.into_bytes())
            } else {
                log::warn!(
                    "SESSION_KEY shorter than {} bytes, using a generated key",
                    SESSION_KEY_MIN_LEN
                );
                None
            }
        });

        Self {
            host: non_empty("HOST").unwrap_or_else(default_host),
            port,
            data_file: non_empty("DATA_FILE").map(PathBuf::from),
            session_key,
        }
    }
}
