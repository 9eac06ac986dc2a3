use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub cookie: CookieConfig,
    pub internal: InternalConfig,
    pub blacklist: BlacklistConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// HS256, HS384 or HS512.
    pub algorithm: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OtpConfig {
    pub ttl_minutes: i64,
    /// Log plaintext codes instead of a masked notice.
    #[serde(default)]
    pub reveal_codes: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub refresh_name: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InternalConfig {
    pub secret_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlacklistConfig {
    pub cleanup_interval_secs: u64,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.access_secret == self.jwt.refresh_secret {
            return Err(ConfigError::Message(
                "jwt.access_secret and jwt.refresh_secret must differ".to_string(),
            ));
        }
        if self.jwt.access_ttl_minutes <= 0 || self.jwt.refresh_ttl_minutes <= 0 {
            return Err(ConfigError::Message("jwt token lifetimes must be positive".to_string()));
        }
        if self.otp.ttl_minutes <= 0 {
            return Err(ConfigError::Message("otp.ttl_minutes must be positive".to_string()));
        }
        if self.blacklist.cleanup_interval_secs == 0 {
            return Err(ConfigError::Message(
                "blacklist.cleanup_interval_secs must be positive".to_string(),
            ));
        }
        if self.internal.secret_token.is_empty() {
            return Err(ConfigError::Message("internal.secret_token must be set".to_string()));
        }
        Ok(())
    }
}
