//! Configuration module
//!
//! Back office configuration read from the environment (and `.env` when present):
//! HTTP server, catalog database, session verification and CDN credentials.

use std::env;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const CDN_API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const CDN_TIMEOUT_SECS: u64 = 30;
const CLEANUP_CONCURRENCY: usize = 8;
const TRUSTED_PROXY_COUNT: usize = 1;

/// Account credentials for the CDN admin API.
#[derive(Clone, PartialEq, Eq)]
pub struct CdnCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Debug for CdnCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CdnCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Digest the CDN account expects request signatures in.
///
/// Accounts sign with SHA-1 until switched to SHA-256 in their security
/// settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1",
            SignatureAlgorithm::Sha256 => "sha256",
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(SignatureAlgorithm::Sha256),
            other => Err(anyhow::anyhow!(
                "CDN_SIGNATURE_ALGORITHM must be sha1 or sha256, got '{}'",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub run_migrations: bool,
    pub session_jwt_secret: String,
    /// `None` when any of the three CDN variables is missing. Remote deletes
    /// then fail before a request is sent.
    pub cdn_credentials: Option<CdnCredentials>,
    pub cdn_api_base_url: String,
    pub cdn_signature_algorithm: SignatureAlgorithm,
    pub cdn_timeout_seconds: u64,
    pub cleanup_concurrency: usize,
    pub trusted_proxy_count: usize,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Read the process environment without loading `.env` or validating.
    pub fn from_env_vars() -> Result<Self, anyhow::Error> {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match env::var("PORT") {
            Ok(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            Err(_) => SERVER_PORT,
        };

        let cdn_credentials = match (
            non_empty("CDN_CLOUD_NAME"),
            non_empty("CDN_API_KEY"),
            non_empty("CDN_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CdnCredentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let cdn_signature_algorithm = match non_empty("CDN_SIGNATURE_ALGORITHM") {
            Some(value) => value.parse()?,
            None => SignatureAlgorithm::default(),
        };

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            run_migrations: parse_or("RUN_MIGRATIONS", true),
            session_jwt_secret: env::var("SESSION_JWT_SECRET").map_err(|_| {
                anyhow::anyhow!("SESSION_JWT_SECRET must be set for session verification")
            })?,
            cdn_credentials,
            cdn_api_base_url: non_empty("CDN_API_BASE_URL")
                .unwrap_or_else(|| CDN_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            cdn_signature_algorithm,
            cdn_timeout_seconds: parse_or("CDN_TIMEOUT_SECONDS", CDN_TIMEOUT_SECS),
            cleanup_concurrency: parse_or("CLEANUP_CONCURRENCY", CLEANUP_CONCURRENCY),
            trusted_proxy_count: parse_or("TRUSTED_PROXY_COUNT", TRUSTED_PROXY_COUNT),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.session_jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "SESSION_JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.cdn_api_base_url.starts_with("http://")
            || self.cdn_api_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!("CDN_API_BASE_URL must be an http(s) URL"));
        }

        if self.cleanup_concurrency == 0 {
            return Err(anyhow::anyhow!("CLEANUP_CONCURRENCY must be at least 1"));
        }

        Ok(())
    }
}
