//! Configuration management.
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file. Command-line flags override the bind address and database path.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::db::Database;
use crate::error::ConfigError;
use crate::mail::{DEFAULT_RECIPIENT, DEFAULT_SENDER};

// Environment variable names
const ENV_BIND: &str = "CONTACTMANAGER_BIND";
const ENV_DB: &str = "CONTACTMANAGER_DB";
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
const ENV_MAIL_ENABLED: &str = "MAIL_ENABLED";
const ENV_SMTP_HOST: &str = "SMTP_HOST";
const ENV_SMTP_PORT: &str = "SMTP_PORT";
const ENV_SMTP_TLS: &str = "SMTP_TLS";
const ENV_SMTP_ACCEPT_INVALID_CERTS: &str = "SMTP_ACCEPT_INVALID_CERTS";
const ENV_SMTP_TIMEOUT_SECS: &str = "SMTP_TIMEOUT_SECS";
const ENV_MAIL_FROM: &str = "MAIL_FROM";
const ENV_MAIL_TO: &str = "MAIL_TO";
const ENV_MAIL_DISPATCH: &str = "MAIL_DISPATCH";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_SMTP_HOST: &str = "localhost";
pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailTls {
    /// Plain connection to a local relay
    #[default]
    None,
    /// Upgrade with STARTTLS when the relay offers it
    Opportunistic,
}

impl MailTls {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Some(Self::None),
            "opportunistic" | "starttls" => Some(Self::Opportunistic),
            _ => None,
        }
    }
}

/// Whether a save waits for its alert email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertDispatch {
    /// Deliver on a spawned task; the response does not wait
    #[default]
    Background,
    /// Deliver before the response is returned
    Inline,
}

impl AlertDispatch {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "background" | "detached" => Some(Self::Background),
            "inline" => Some(Self::Inline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub tls: MailTls,
    /// Unsafe: skips certificate validation when TLS is used
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
    pub from: String,
    pub to: String,
    pub dispatch: AlertDispatch,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            tls: MailTls::default(),
            accept_invalid_certs: false,
            timeout_secs: DEFAULT_SMTP_TIMEOUT_SECS,
            from: DEFAULT_SENDER.to_string(),
            to: DEFAULT_RECIPIENT.to_string(),
            dispatch: AlertDispatch::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Explicit database path; `None` means the default location
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_address = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::invalid(ENV_BIND, format!("Not a socket address: {}", bind_raw)))?;

        let database_path = get(ENV_DB).map(PathBuf::from);
        let log_level = get(ENV_LOG_LEVEL).unwrap_or_else(|| "info".to_string());

        let defaults = MailConfig::default();
        let tls = match get(ENV_SMTP_TLS) {
            Some(raw) => MailTls::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(ENV_SMTP_TLS, format!("Expected none or opportunistic, got: {}", raw))
            })?,
            None => defaults.tls,
        };
        let dispatch = match get(ENV_MAIL_DISPATCH) {
            Some(raw) => AlertDispatch::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(ENV_MAIL_DISPATCH, format!("Expected background or inline, got: {}", raw))
            })?,
            None => defaults.dispatch,
        };

        let mail = MailConfig {
            enabled: parse_bool(ENV_MAIL_ENABLED, get(ENV_MAIL_ENABLED), defaults.enabled)?,
            smtp_host: get(ENV_SMTP_HOST).unwrap_or(defaults.smtp_host),
            smtp_port: parse_number(ENV_SMTP_PORT, get(ENV_SMTP_PORT), defaults.smtp_port)?,
            tls,
            accept_invalid_certs: parse_bool(
                ENV_SMTP_ACCEPT_INVALID_CERTS,
                get(ENV_SMTP_ACCEPT_INVALID_CERTS),
                defaults.accept_invalid_certs,
            )?,
            timeout_secs: parse_number(
                ENV_SMTP_TIMEOUT_SECS,
                get(ENV_SMTP_TIMEOUT_SECS),
                defaults.timeout_secs,
            )?,
            from: get(ENV_MAIL_FROM).unwrap_or(defaults.from),
            to: get(ENV_MAIL_TO).unwrap_or(defaults.to),
            dispatch,
        };

        Ok(Config {
            bind_address,
            database_path,
            log_level,
            mail,
        })
    }

    /// The configured database path, or the default location.
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Database::default_path().ok_or(ConfigError::NoDatabasePath),
        }
    }
}

fn parse_bool(var: &str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, format!("Expected true or false, got: {}", raw))),
    }
}

/// Parse a strictly positive number; zero is rejected like any other bad value.
fn parse_number<T>(var: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let Some(val) = raw else {
        return Ok(default);
    };
    match val.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(ConfigError::invalid(
            var,
            format!("Must be a positive number, got: {}", val),
        )),
    }
}
