use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub backend_url: String,
    pub jwt_secret: String,
    pub api_prefix: String,
    pub log_dir: String,

    pub backend_timeout_secs: u64,

    // Query cache
    pub cache_ttl_secs: u64,
    pub cache_max_capacity: u64,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_preview_per_min: u32,

    // Preview math
    pub risk_premium_rate: f64,
    pub default_ndfl_rate: f64,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn optional<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: required("SERVER_ADDR")?,
            backend_url: required("BACKEND_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),

            backend_timeout_secs: optional("BACKEND_TIMEOUT_SECS", 30)?,

            cache_ttl_secs: optional("CACHE_TTL_SECS", 60)?, // React-Query style staleness
            cache_max_capacity: optional("CACHE_MAX_CAPACITY", 10_000)?,

            rate_protected_per_min: optional("RATE_PROTECTED_PER_MIN", 1000)?,
            rate_preview_per_min: optional("RATE_PREVIEW_PER_MIN", 600)?,

            risk_premium_rate: optional("RISK_PREMIUM_RATE", 0.10)?,
            default_ndfl_rate: optional("DEFAULT_NDFL_RATE", 0.13)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.rate_protected_per_min == 0 || self.rate_preview_per_min == 0 {
            bail!("rate limits must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.default_ndfl_rate) {
            bail!("DEFAULT_NDFL_RATE must be within [0, 1]");
        }
        if self.risk_premium_rate < 0.0 {
            bail!("RISK_PREMIUM_RATE must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(backend_url: &str) -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            backend_url: backend_url.to_string(),
            jwt_secret: "test-secret".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            backend_timeout_secs: 5,
            cache_ttl_secs: 60,
            cache_max_capacity: 100,
            rate_protected_per_min: 1000,
            rate_preview_per_min: 1000,
            risk_premium_rate: 0.10,
            default_ndfl_rate: 0.13,
        }
    }
}
