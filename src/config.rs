/// Service configuration loader - parses solark.toml
///
/// Separates deployment knobs (listen port, feed URLs, model artifact
/// path, fetch timeout) from code. Every field has a compiled-in default,
/// so the service runs with no config file at all; `solark.toml` only
/// needs the fields being overridden.

use std::fs;
use std::io::ErrorKind;

use serde::Deserialize;

use crate::ingest::swpc;

/// Configuration file location, relative to the working directory
/// (project root when running via `cargo run`).
pub const CONFIG_PATH: &str = "solark.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listen port for the forecast endpoint.
    pub port: u16,
    /// Plasma feed (time_tag, density, speed, temperature).
    pub plasma_url: String,
    /// Magnetometer feed (time_tag, b-components, bt).
    pub mag_url: String,
    /// Trained regression model artifact.
    pub model_path: String,
    /// Per-feed fetch timeout, seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            plasma_url: swpc::PLASMA_URL.to_string(),
            mag_url: swpc::MAG_URL.to_string(),
            model_path: "kp_model.json".to_string(),
            fetch_timeout_secs: 10,
        }
    }
}

/// Loads `solark.toml` from the working directory, falling back to the
/// defaults when the file does not exist.
///
/// # Panics
/// Panics if the file exists but cannot be read or parsed. This is
/// intentional — the service must not run on half-applied configuration.
pub fn load_config() -> ServiceConfig {
    match fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => toml::from_str(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", CONFIG_PATH, e)),
        Err(e) if e.kind() == ErrorKind::NotFound => ServiceConfig::default(),
        Err(e) => panic!("Failed to read {}: {}", CONFIG_PATH, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_swpc_one_day_products() {
        let config = ServiceConfig::default();
        assert!(config.plasma_url.contains("plasma-1-day"));
        assert!(config.mag_url.contains("mag-1-day"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.model_path, "kp_model.json");
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let config: ServiceConfig = toml::from_str("port = 9000\nfetch_timeout_secs = 5\n")
            .expect("partial config should parse");
        assert_eq!(config.port, 9000);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.plasma_url, swpc::PLASMA_URL, "unnamed fields keep defaults");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        // Catches typos like `plasma_ur` silently leaving the default in place.
        let result: Result<ServiceConfig, _> = toml::from_str("plasma_ur = \"http://x\"\n");
        assert!(result.is_err(), "unknown keys must fail parsing");
    }

    #[test]
    fn test_full_file_parses() {
        let config: ServiceConfig = toml::from_str(
            r#"
            port = 8081
            plasma_url = "http://localhost:9999/plasma.json"
            mag_url = "http://localhost:9999/mag.json"
            model_path = "models/kp_model.json"
            fetch_timeout_secs = 3
            "#,
        )
        .expect("full config should parse");
        assert_eq!(config.plasma_url, "http://localhost:9999/plasma.json");
        assert_eq!(config.model_path, "models/kp_model.json");
    }

    #[test]
    fn test_load_config_without_file_uses_defaults() {
        // The repo intentionally ships no solark.toml; a fresh checkout
        // must come up on defaults.
        let config = load_config();
        assert_eq!(config.port, ServiceConfig::default().port);
    }
}
