//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. the `--config` command-line path, if given
//! 2. `$MOBLOG_CONFIG` (environment variable)
//! 3. `~/.config/moblog/config.toml` (Linux/macOS)
//!    `%APPDATA%\moblog\config.toml` (Windows)
//! 4. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Inbound filtering and outbound confirmation mail.
    pub mail: MailConfig,
    /// Target blog repository.
    pub blog: BlogConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override directory for the log file.
    pub log_dir: Option<PathBuf>,
}

/// Mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP server used for the confirmation reply, as `host[:port]`.
    pub server: String,
    /// Envelope and header sender of the confirmation reply.
    pub sender: String,
    /// Display name used with `sender`.
    pub sender_name: String,
    /// Accepted senders: `*`, `@domain`, `domain` or `user@domain`.
    pub accept: Vec<String>,
}

/// Blog repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Working copy of the Jekyll blog.
    pub repository: PathBuf,
    /// Build the post from the HTML part instead of the plain-text part.
    pub use_html: bool,
    /// Remote pushed to after committing.
    pub remote: String,
    /// Branch force-pushed to `remote`.
    pub branch: String,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_dir: None,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: "localhost:25".to_string(),
            sender: "moblog@example.com".to_string(),
            sender_name: "moblog".to_string(),
            accept: vec!["*".to_string()],
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            repository: PathBuf::from("/path/to/jekyll/blog"),
            use_html: false,
            remote: "origin".to_string(),
            branch: "master".to_string(),
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration from `explicit` or the standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config(explicit: Option<&Path>) -> Config {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config_file_path(),
    };
    if let Some(path) = path {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MOBLOG_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("moblog").join("config.toml"))
}

/// Return the directory the log file is written to.
pub fn log_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.log_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moblog")
}
