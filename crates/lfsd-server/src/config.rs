use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Process-wide settings, fixed after startup and passed explicitly to the
/// components that need them.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the admin surface listens on.
    pub bind_addr: SocketAddr,
    /// Root of the sharded content tree.
    pub content_path: PathBuf,
    /// Location of the metadata database file.
    pub meta_db: PathBuf,
    /// Admin Basic-auth user; admin is disabled while empty.
    pub admin_user: String,
    /// Admin Basic-auth password; admin is disabled while empty.
    pub admin_pass: String,
    /// Object records upserted per store call during refresh.
    pub refresh_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            content_path: PathBuf::from("lfs-content"),
            meta_db: PathBuf::from("lfs.db"),
            admin_user: String::new(),
            admin_pass: String::new(),
            refresh_batch_size: 512,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Admin endpoints are served only when both credentials are set.
    pub fn admin_enabled(&self) -> bool {
        !self.admin_user.is_empty() && !self.admin_pass.is_empty()
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("content_path", &self.content_path)
            .field("meta_db", &self.meta_db)
            .field("admin_user", &self.admin_user)
            .field("admin_pass", &if self.admin_pass.is_empty() { "" } else { "<redacted>" })
            .field("refresh_batch_size", &self.refresh_batch_size)
            .finish()
    }
}
