//! Application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Festival instance configuration.
    pub festival: FestivalConfig,
    /// Auth provider configuration.
    pub auth: AuthConfig,
    /// Email delivery configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Admin directory configuration.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Screenshot storage configuration.
    #[serde(default)]
    pub storage: crate::StorageConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Festival instance configuration.
///
/// The system is hardcoded to a single festival instance; these fields feed
/// email templates and exported filenames, not a multi-tenant abstraction.
#[derive(Debug, Clone, Deserialize)]
pub struct FestivalConfig {
    /// Festival display name (e.g. "Aakriti 2026").
    pub name: String,
    /// Public site URL used in notification emails.
    pub site_url: String,
    /// Contact email shown to participants.
    #[serde(default)]
    pub contact_email: Option<String>,
}

/// External auth provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth provider's session-verification API.
    pub provider_url: String,
    /// Request timeout in seconds for auth calls.
    #[serde(default = "default_auth_timeout")]
    pub timeout_secs: u64,
}

/// Email delivery configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EmailConfig {
    /// Provider kind: "sendgrid", "mailgun" or "smtp". Empty disables email.
    #[serde(default)]
    pub provider: Option<String>,
    /// From address.
    #[serde(default)]
    pub from_address: Option<String>,
    /// From display name.
    #[serde(default)]
    pub from_name: Option<String>,
    /// Provider API key (SendGrid / Mailgun).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Mailgun sending domain.
    #[serde(default)]
    pub mailgun_domain: Option<String>,
    /// Use the Mailgun EU region.
    #[serde(default)]
    pub mailgun_eu_region: bool,
    /// SMTP host.
    #[serde(default)]
    pub smtp_host: Option<String>,
    /// SMTP port.
    #[serde(default)]
    pub smtp_port: Option<u16>,
}

/// Admin directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Seconds a cached admin-email snapshot stays fresh.
    #[serde(default = "default_admin_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_admin_cache_ttl(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_auth_timeout() -> u64 {
    10
}

const fn default_admin_cache_ttl() -> u64 {
    300
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FESTA_ENV`)
    /// 3. Environment variables with `FESTA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("FESTA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FESTA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
