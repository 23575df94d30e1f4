use serde::Deserialize;

use crate::domain::RetryConfig;

/// Application configuration
///
/// Sources, later ones winning: `config/default.*`, `config/local.*`, then
/// `APP__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub chain: ChainConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Falls back to `DATABASE_URL`
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Falls back to `JWT_SECRET`; a random secret is generated when both are unset
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Falls back to `WEB3_PROVIDER_URL`
    pub rpc_url: Option<String>,
    /// Falls back to `LOAN_MANAGER_ADDRESS`
    pub lending_contract_address: Option<String>,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiration_hours: 24,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            lending_contract_address: None,
            request_timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    /// Fill unset values from the plain variables used by older deployments
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        fill(&mut self.storage.database_url, || lookup("DATABASE_URL"));
        fill(&mut self.auth.jwt_secret, || lookup("JWT_SECRET"));
        fill(&mut self.chain.rpc_url, || lookup("WEB3_PROVIDER_URL"));
        fill(&mut self.chain.lending_contract_address, || {
            lookup("LOAN_MANAGER_ADDRESS")
        });
    }
}

fn fill<F>(slot: &mut Option<String>, fallback: F)
where
    F: FnOnce() -> Option<String>,
{
    let is_blank = slot.as_deref().is_none_or(|v| v.trim().is_empty());

    if is_blank {
        *slot = fallback();
    }
}
