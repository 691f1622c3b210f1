use anyhow::Result;
use config::{Config, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Catalog API base, e.g. "http://127.0.0.1:8000".
    pub api_url: String,
    /// Service control host (start/stop/events). Same host as the catalog
    /// in the stock deployment.
    pub services_url: String,
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            services_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

pub fn load_config(path: &str) -> Result<BackendConfig> {
    let defaults = BackendConfig::default();
    let config = Config::builder()
        .set_default("api_url", defaults.api_url)?
        .set_default("services_url", defaults.services_url)?
        .set_default("request_timeout_ms", defaults.request_timeout_ms)?
        .add_source(File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("NODESIM"))
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = BackendConfig::default();
        assert_eq!(cfg.api_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.services_url, cfg.api_url);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config("does-not-exist").unwrap();
        assert_eq!(cfg.request_timeout_ms, 5000);
    }
}
