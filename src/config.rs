use crate::error::CredwatchError;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use url::Url;

fn default_loglevel() -> String {
    "info".to_string()
}

/// Process configuration, built once in `main` and passed down explicitly.
///
/// `SERVICE_URL` and `SERVICE_KEY` are required and validated here, before
/// any network activity. `LOGLEVEL` falls back to `info`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service_url: Url,
    pub service_key: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
}

impl Config {
    pub fn from_env() -> Result<Self, CredwatchError> {
        let cfg: Config = Figment::new()
            .merge(Env::raw().only(&["SERVICE_URL", "SERVICE_KEY", "LOGLEVEL"]))
            .extract()?;

        if cfg.service_key.trim().is_empty() {
            return Err(CredwatchError::EmptyServiceKey);
        }
        Ok(cfg)
    }
}
