//! Layered configuration
//!
//! Settings come from four sources, lowest to highest precedence:
//! built-in defaults, an optional TOML file, `AUTHGATE_*` environment
//! variables, and CLI flags. Every loaded configuration is validated
//! before use so bad values fail at startup, not mid-request.

use clap::Parser;
use config::{Config as ConfigBuilder, ConfigError as BuilderError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("server config: {0}")]
    InvalidServer(String),

    #[error("database config: {0}")]
    InvalidDatabase(String),

    #[error("logging config: {0}")]
    InvalidLogging(String),

    #[error("security config: {0}")]
    InvalidSecurity(String),

    #[error("could not load configuration: {0}")]
    LoadError(String),

    #[error("config file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from all sources, CLI flags winning over
    /// environment variables, the config file, and defaults
    pub fn load() -> Result<Self, ConfigError> {
        let cli = CliArgs::parse();
        Self::from_sources(&cli)
    }

    /// Load configuration from a single TOML file over the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn from_sources(cli: &CliArgs) -> Result<Self, ConfigError> {
        let mut builder = defaults(ConfigBuilder::builder())?;

        if let Some(path) = &cli.config {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            builder = builder.add_source(File::from(path.as_path()));
        }

        // AUTHGATE_SERVER__PORT=8080 maps to server.port
        builder = builder.add_source(
            Environment::with_prefix("AUTHGATE")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(db_path) = &cli.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(level) = &cli.log_level {
            builder = builder.set_override("logging.level", level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        self.security.validate()
    }
}

fn defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5000)?
        .set_default("database.path", "./data/authgate.db")?
        .set_default("database.connection_pool_size", 10)?
        .set_default("database.busy_timeout", 5000)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "json")?
        .set_default("logging.output", "stdout")?
        .set_default("security.jwt_secret", "change-this-secret-in-production")?
        .set_default(
            "security.allowed_origins",
            vec!["http://localhost:5173".to_string()],
        )?
        .set_default("security.cookie_secure", false)?)
}

/// Command-line flags, each overriding its configured counterpart
#[derive(Debug, Parser)]
#[command(name = "authgate")]
#[command(about = "Credential authentication service", long_about = None)]
pub struct CliArgs {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level override (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidServer("port must be nonzero".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: usize,
    /// SQLite busy timeout in milliseconds
    pub busy_timeout: u64,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path is empty".to_string()));
        }
        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase(
                "connection_pool_size must be nonzero".to_string(),
            ));
        }
        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase(
                "busy_timeout must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.level.as_str() {
            "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::InvalidLogging(format!(
                    "unknown level '{}'",
                    other
                )))
            }
        }

        match self.format.as_str() {
            "json" | "text" => {}
            other => {
                return Err(ConfigError::InvalidLogging(format!(
                    "unknown format '{}'",
                    other
                )))
            }
        }

        match self.output.as_str() {
            "stdout" => {}
            "file" => {
                if self.log_file.is_none() {
                    return Err(ConfigError::InvalidLogging(
                        "log_file is required when output is 'file'".to_string(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::InvalidLogging(format!(
                    "unknown output '{}'",
                    other
                )))
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// HMAC key for signing session tokens
    pub jwt_secret: String,
    /// Origins allowed to make credentialed browser requests; "*" mirrors
    /// the request origin
    pub allowed_origins: Vec<String>,
    /// Set the Secure attribute on session cookies (requires HTTPS)
    pub cookie_secure: bool,
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "jwt_secret is empty".to_string(),
            ));
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "allowed_origins is empty".to_string(),
            ));
        }
        Ok(())
    }
}
