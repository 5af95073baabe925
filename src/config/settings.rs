//! Application settings and configuration
//!
//! Settings are read from environment variables (and an optional `.env`
//! file) with defaults matching the deployed stack.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Application environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Where song records live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// DynamoDB tables (the deployed configuration)
    #[default]
    #[value(name = "dynamodb", alias = "dynamo")]
    DynamoDb,
    /// Process-local maps, for running without AWS
    #[value(alias = "mem")]
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::DynamoDb => write!(f, "dynamodb"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(StorageBackend::DynamoDb),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => anyhow::bail!("Invalid storage backend: {}. Expected: dynamodb or memory", s),
        }
    }
}

/// Session cookie authorization
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Gate write routes behind a verified session cookie
    pub require_auth: bool,

    /// Name of the cookie carrying the identity token
    pub cookie_name: String,

    /// Shared secret used to verify the token signature
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,

    /// Identity pool the tokens are issued by; checked against `iss` when set
    pub user_pool_id: Option<String>,

    /// App client the tokens are issued to; checked against `aud` when set
    pub user_pool_client_id: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            cookie_name: "token".to_string(),
            jwt_secret: None,
            user_pool_id: None,
            user_pool_client_id: None,
        }
    }
}

/// Translation backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationConfig {
    /// Language every stored title is written in
    pub source_language: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // AWS settings
    pub aws_region: String,
    pub dynamodb_endpoint_url: Option<String>,
    pub translate_endpoint_url: Option<String>,

    // Storage
    pub storage_backend: StorageBackend,
    /// Directory holding `songs.json` / `song_artists.json` to preload the memory backend
    pub seed_dir: Option<PathBuf>,

    // DynamoDB tables
    pub songs_table: String,
    pub song_artists_table: String,
    pub stage_name_index: String,

    pub translation: TranslationConfig,
    pub auth: AuthConfig,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Self {
            app_name: env_or_default("APP_NAME", "songs-api"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", "8000")
                .parse()
                .context("Invalid PORT value")?,

            // The deployed functions receive the region as REGION
            aws_region: env::var("AWS_REGION")
                .or_else(|_| env::var("REGION"))
                .unwrap_or_else(|_| "eu-west-1".to_string()),
            dynamodb_endpoint_url: env::var("DYNAMODB_ENDPOINT_URL").ok(),
            translate_endpoint_url: env::var("TRANSLATE_ENDPOINT_URL").ok(),

            storage_backend: env_or_default("STORAGE_BACKEND", "dynamodb")
                .parse()
                .context("Invalid STORAGE_BACKEND value")?,
            seed_dir: env::var("SEED_DIR").ok().map(PathBuf::from),

            songs_table: env_or_default("TABLE_NAME", "Songs"),
            song_artists_table: env_or_default("SONG_ARTISTS_TABLE_NAME", "SongArtists"),
            stage_name_index: env_or_default("STAGE_NAME_INDEX", "stageNameIx"),

            translation: TranslationConfig {
                source_language: env_or_default("TRANSLATE_SOURCE_LANGUAGE", "en"),
            },

            auth: AuthConfig {
                require_auth: env_or_default("REQUIRE_AUTH", "true")
                    .parse()
                    .unwrap_or(true),
                cookie_name: env_or_default("SESSION_COOKIE_NAME", "token"),
                jwt_secret: env::var("AUTH_JWT_SECRET").ok(),
                user_pool_id: env::var("USER_POOL_ID").ok(),
                user_pool_client_id: env::var("USER_POOL_CLIENT_ID").ok(),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.songs_table.is_empty() || self.song_artists_table.is_empty() {
            anyhow::bail!("Table names cannot be empty");
        }

        if self.translation.source_language.is_empty() {
            anyhow::bail!("Translation source language cannot be empty");
        }

        Ok(())
    }

    /// Validate the session authorization settings needed to serve requests
    pub fn validate_auth(&self) -> Result<()> {
        if self.auth.require_auth && self.auth.jwt_secret.is_none() {
            anyhow::bail!("REQUIRE_AUTH is enabled but AUTH_JWT_SECRET is not set");
        }

        if self.environment == Environment::Production && !self.auth.require_auth {
            tracing::warn!("Running in production without session authorization!");
        }

        Ok(())
    }

    /// Expected `iss` claim for identity tokens, if an identity pool is configured
    pub fn token_issuer(&self) -> Option<String> {
        self.auth.user_pool_id.as_ref().map(|pool| {
            format!("https://cognito-idp.{}.amazonaws.com/{}", self.aws_region, pool)
        })
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "songs-api".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            aws_region: "eu-west-1".to_string(),
            dynamodb_endpoint_url: None,
            translate_endpoint_url: None,
            storage_backend: StorageBackend::DynamoDb,
            seed_dir: None,
            songs_table: "Songs".to_string(),
            song_artists_table: "SongArtists".to_string(),
            stage_name_index: "stageNameIx".to_string(),
            translation: TranslationConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "songs-api");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.songs_table, "Songs");
        assert_eq!(settings.stage_name_index, "stageNameIx");
        assert_eq!(settings.translation.source_language, "en");
        assert!(settings.auth.require_auth);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("DynamoDB".parse::<StorageBackend>().unwrap(), StorageBackend::DynamoDb);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_auth_requires_secret() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.validate_auth().is_err());

        settings.auth.jwt_secret = Some("secret".to_string());
        assert!(settings.validate_auth().is_ok());

        settings.auth.jwt_secret = None;
        settings.auth.require_auth = false;
        assert!(settings.validate_auth().is_ok());
    }

    #[test]
    fn test_token_issuer() {
        let mut settings = Settings::default();
        assert_eq!(settings.token_issuer(), None);

        settings.auth.user_pool_id = Some("eu-west-1_abc123".to_string());
        assert_eq!(
            settings.token_issuer().as_deref(),
            Some("https://cognito-idp.eu-west-1.amazonaws.com/eu-west-1_abc123")
        );
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:8000");
    }
}
