use std::time::Duration;

use anyhow::{bail, Context};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_STORE_DATABASE_URL: &str = "taller-reservas.db";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FORM_IDLE_TIMEOUT_SECS: u64 = 30 * 60;
pub const DEFAULT_LOG_FILTER: &str = "info,taller_reservas=debug";

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub bind_addr: String,
    pub store_database_url: String,
    pub backend_timeout: Duration,
    pub form_idle_timeout: Duration,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> anyhow::Result<Self> {
        let backend_url = lookup("BACKEND_URL").context("BACKEND_URL not found")?;
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            bail!("BACKEND_URL must be an http(s) URL, got {}", backend_url);
        }

        let backend_timeout =
            secs_var(&lookup, "BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS)?;
        let form_idle_timeout =
            secs_var(&lookup, "FORM_IDLE_TIMEOUT_SECS", DEFAULT_FORM_IDLE_TIMEOUT_SECS)?;

        Ok(Self {
            backend_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            store_database_url: lookup("STORE_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_STORE_DATABASE_URL.to_string()),
            backend_timeout,
            form_idle_timeout,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn secs_var<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    key: &str,
    default: u64,
) -> anyhow::Result<Duration> {
    let secs = match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("Invalid {}: {}", key, raw))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}
