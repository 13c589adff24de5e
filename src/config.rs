//! Server configuration module.
//!
//! Handles loading, validating, and merging `placeholdr.toml`. User values
//! are layered on top of the stock defaults, so a config file only needs the
//! keys it wants to change.
//!
//! ## Config File Location
//!
//! By default `placeholdr.toml` is read from the working directory; a
//! missing default file simply means "use the defaults". `--config <path>`
//! points somewhere else, and then the file must exist.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! host = "localhost"        # Interface to bind
//! port = 8080               # TCP port
//! path_prefix = "/"         # Images are served at {path_prefix}/{format}
//!
//! [cors]
//! allow_origins = ["*"]     # "*" allows any origin
//! allow_methods = ["GET", "POST", "PUT", "PATCH", "DELETE"]
//!
//! [render]
//! font = "/path/to/font.ttf" # Omit to use the embedded DejaVu Sans
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::FontSource;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file read when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "placeholdr.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Service configuration loaded from `placeholdr.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listener and routing settings.
    pub server: ListenConfig,
    /// Cross-origin resource sharing policy.
    pub cors: CorsConfig,
    /// Rendering settings shared by `serve` and `render`.
    pub render: RenderConfig,
}

impl ServerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        if !self.server.path_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "server.path_prefix must start with '/'".into(),
            ));
        }
        if self.cors.allow_origins.is_empty() {
            return Err(ConfigError::Validation(
                "cors.allow_origins must not be empty".into(),
            ));
        }
        if self.cors.allow_methods.is_empty() {
            return Err(ConfigError::Validation(
                "cors.allow_methods must not be empty".into(),
            ));
        }
        self.cors.methods()?;
        Ok(())
    }

    /// Apply command-line overrides, which always win over the file.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    /// Route prefix; `"/"` serves images from the root.
    pub path_prefix: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            path_prefix: "/".to_string(),
        }
    }
}

impl ListenConfig {
    /// `host:port`, as accepted by `tokio::net::TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The prefix without a trailing slash; empty for the root.
    pub fn normalized_prefix(&self) -> &str {
        self.path_prefix.trim_end_matches('/')
    }
}

/// CORS settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins. A `"*"` entry allows any origin.
    pub allow_origins: Vec<String>,
    /// Allowed request methods.
    pub allow_methods: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: ["GET", "POST", "PUT", "PATCH", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }

    /// Parse the configured method names.
    pub fn methods(&self) -> Result<Vec<Method>, ConfigError> {
        self.allow_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.as_bytes()).map_err(|_| {
                    ConfigError::Validation(format!("cors.allow_methods: invalid method {m:?}"))
                })
            })
            .collect()
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// TrueType font file for the overlay text. When absent the embedded
    /// DejaVu Sans is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

impl RenderConfig {
    pub fn font_source(&self) -> FontSource {
        match &self.font {
            Some(path) => FontSource::File(path.clone()),
            None => FontSource::Embedded,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ServerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ServerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration.
///
/// With `Some(path)` the file must exist. With `None`, `placeholdr.toml` in
/// the working directory is used if present and the stock defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = match explicit {
        Some(path) => {
            let raw = load_raw_config(path)?;
            if raw.is_none() {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file {} not found", path.display()),
                )));
            }
            raw
        }
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `placeholdr.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Placeholdr Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (serve --host/--port) override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Listener
# ---------------------------------------------------------------------------
[server]
# Interface to bind.
host = "localhost"

# TCP port.
port = 8080

# Images are served at {path_prefix}/{format}, e.g. /img/png when set to "/img".
path_prefix = "/"

# ---------------------------------------------------------------------------
# Cross-origin resource sharing
# ---------------------------------------------------------------------------
[cors]
# Allowed origins. "*" allows any origin.
allow_origins = ["*"]

# Allowed request methods.
allow_methods = ["GET", "POST", "PUT", "PATCH", "DELETE"]

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# TrueType font used for the overlay text.
# Omit or comment out to use the embedded DejaVu Sans.
# font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("placeholdr.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_mirrors_stock_flags() {
        let config = ServerConfig::default();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.path_prefix, "/");
        assert_eq!(config.cors.allow_origins, vec!["*"]);
        assert_eq!(
            config.cors.allow_methods,
            vec!["GET", "POST", "PUT", "PATCH", "DELETE"]
        );
        assert_eq!(config.render.font, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
port = 9000
"#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        // Defaults preserved
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.cors.allow_origins, vec!["*"]);
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[server]
host = "0.0.0.0"
path_prefix = "/img"

[cors]
allow_origins = ["https://example.com"]
allow_methods = ["GET"]

[render]
font = "/fonts/custom.ttf"
"#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.path_prefix, "/img");
        assert_eq!(config.cors.allow_origins, vec!["https://example.com"]);
        assert_eq!(config.cors.allow_methods, vec!["GET"]);
        assert_eq!(
            config.render.font_source(),
            FontSource::File("/fonts/custom.ttf".into())
        );
    }

    #[test]
    fn load_config_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "this is not valid toml [[[");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[server]\nport = 0\n");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = "[server]\nhostname = \"x\"\n";
        assert!(toml::from_str::<ServerConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = "[database]\nurl = \"x\"\n";
        assert!(toml::from_str::<ServerConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[render]\nfont_size = 12\n");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_prefix_must_be_absolute() {
        let mut config = ServerConfig::default();
        config.server.path_prefix = "img".into();
        assert!(config.validate().is_err());
        config.server.path_prefix = "/img".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_cors_lists_non_empty() {
        let mut config = ServerConfig::default();
        config.cors.allow_origins.clear();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.cors.allow_methods.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_method() {
        let mut config = ServerConfig::default();
        config.cors.allow_methods = vec!["GET".into(), "NOT A METHOD".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("NOT A METHOD"));
    }

    #[test]
    fn methods_parse_to_http_methods() {
        let methods = CorsConfig::default().methods().unwrap();
        assert_eq!(
            methods,
            vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE
            ]
        );
    }

    #[test]
    fn any_origin_only_with_wildcard() {
        assert!(CorsConfig::default().allows_any_origin());
        let cors = CorsConfig {
            allow_origins: vec!["https://example.com".into()],
            ..CorsConfig::default()
        };
        assert!(!cors.allows_any_origin());
    }

    // =========================================================================
    // Listener helpers and overrides
    // =========================================================================

    #[test]
    fn bind_address_joins_host_and_port() {
        assert_eq!(ListenConfig::default().bind_address(), "localhost:8080");
    }

    #[test]
    fn normalized_prefix_drops_trailing_slash() {
        let mut listen = ListenConfig::default();
        assert_eq!(listen.normalized_prefix(), "");
        listen.path_prefix = "/img/".into();
        assert_eq!(listen.normalized_prefix(), "/img");
    }

    #[test]
    fn cli_overrides_win() {
        let config = ServerConfig::default().with_overrides(Some("0.0.0.0".into()), Some(3000));
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");

        let untouched = ServerConfig::default().with_overrides(None, None);
        assert_eq!(untouched, ServerConfig::default());
    }

    #[test]
    fn font_source_defaults_to_embedded() {
        assert_eq!(RenderConfig::default().font_source(), FontSource::Embedded);
    }

    // =========================================================================
    // merge_toml / resolve_config
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[server]\nhost = \"a\"\nport = 1\n").unwrap();
        let overlay: toml::Value = toml::from_str("[server]\nport = 2\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["server"]["host"].as_str(), Some("a"));
        assert_eq!(merged["server"]["port"].as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value =
            toml::from_str("[cors]\nallow_methods = [\"GET\", \"POST\"]\n").unwrap();
        let overlay: toml::Value = toml::from_str("[cors]\nallow_methods = [\"PUT\"]\n").unwrap();
        let merged = merge_toml(base, overlay);
        let methods = merged["cors"]["allow_methods"].as_array().unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].as_str(), Some("PUT"));
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value().unwrap(), None).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(&tmp.path().join("nope.toml")).unwrap().is_none());
    }

    // =========================================================================
    // stock_config_toml
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ServerConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[server]", "[cors]", "[render]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }
}
