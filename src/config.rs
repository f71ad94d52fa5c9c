//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.lyceum/config.toml` (user)
//! 3. `/etc/lyceum/config.toml` (system)
//!
//! Admin credentials are loaded separately with mandatory permission checks:
//! 1. `~/.lyceum/secrets.toml` (user, must be 0600)
//! 2. `/etc/lyceum/secrets.toml` (system, must be 0600)
//! 3. `LYCEUM_ADMIN_EMAIL` / `LYCEUM_ADMIN_PASSWORD` environment variables

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::types::AdminCredentials;
use crate::{LyceumError, Result};

/// Environment variable holding the admin email.
pub const ADMIN_EMAIL_ENV: &str = "LYCEUM_ADMIN_EMAIL";
/// Environment variable holding the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "LYCEUM_ADMIN_PASSWORD";

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Remote API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the API prefix (default: http://localhost:5000/api).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Response cache settings, in whole seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    #[serde(default = "default_short_ttl")]
    pub short_ttl_secs: u64,
    #[serde(default = "default_medium_ttl")]
    pub medium_ttl_secs: u64,
    #[serde(default = "default_long_ttl")]
    pub long_ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            short_ttl_secs: default_short_ttl(),
            medium_ttl_secs: default_medium_ttl(),
            long_ttl_secs: default_long_ttl(),
        }
    }
}

impl CacheSection {
    /// Convert to the runtime cache configuration.
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.max_entries,
            short_ttl: Duration::from_secs(self.short_ttl_secs),
            medium_ttl: Duration::from_secs(self.medium_ttl_secs),
            long_ttl: Duration::from_secs(self.long_ttl_secs),
        }
    }
}

fn default_max_entries() -> u64 {
    CacheConfig::default().max_entries
}

fn default_short_ttl() -> u64 {
    CacheConfig::default().short_ttl.as_secs()
}

fn default_medium_ttl() -> u64 {
    CacheConfig::default().medium_ttl.as_secs()
}

fn default_long_ttl() -> u64 {
    CacheConfig::default().long_ttl.as_secs()
}

/// Secrets file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub admin: Option<AdminCredentials>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.lyceum/config.toml`
    /// 3. `/etc/lyceum/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        Self::load_from_file(&path)
    }

    /// Like [`load`](Self::load), but falls back to defaults when no config
    /// file exists in the standard locations. An explicit path must exist.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::load(Some(path)),
            None => match Self::standard_paths().into_iter().find(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LyceumError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            LyceumError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(LyceumError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Self::standard_paths()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                LyceumError::Configuration(
                    "No config file found. Create ~/.lyceum/config.toml or /etc/lyceum/config.toml"
                        .to_string(),
                )
            })
    }

    fn standard_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(2);
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".lyceum").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/lyceum/config.toml"));
        paths
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (credentials may come from
    /// env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".lyceum").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/lyceum/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a specific secrets file, enforcing permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            LyceumError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            LyceumError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            LyceumError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(LyceumError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Admin credentials from the secrets file, falling back to the
    /// `LYCEUM_ADMIN_EMAIL` / `LYCEUM_ADMIN_PASSWORD` environment variables.
    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        self.admin.clone().or_else(|| {
            let email = std::env::var(ADMIN_EMAIL_ENV).ok()?;
            let password = std::env::var(ADMIN_PASSWORD_ENV).ok()?;
            Some(AdminCredentials::new(email, password))
        })
    }
}
