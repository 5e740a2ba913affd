use std::{env, time::Duration};

use actix_web::cookie::Key;

use crate::errors::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://invoicer.db";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Outbound mail relay settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

/// Everything the server reads from the environment at startup.
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_key: Key,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub smtp: SmtpSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_key = lookup("SESSION_KEY").ok_or_else(|| {
            AppError::ConfigError("SESSION_KEY environment variable not set".to_owned())
        })?;
        let session_key = Key::try_from(session_key.as_bytes()).map_err(|_| {
            AppError::ConfigError("SESSION_KEY must be at least 64 bytes long".to_owned())
        })?;

        let username = required(&lookup, "EMAIL_USER")?;
        let password = required(&lookup, "EMAIL_PASS")?;

        Ok(Settings {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&lookup, "PORT", 8000)?,
            session_key,
            session_ttl: session_ttl(parse_or(&lookup, "SESSION_TTL_HOURS", 24u64)?)?,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", true)?,
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.trim().is_empty()),
            smtp: SmtpSettings {
                host: lookup("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
                port: parse_or(&lookup, "SMTP_PORT", 465)?,
                from_email: username.clone(),
                username,
                password,
            },
        })
    }
}

fn session_ttl(hours: u64) -> Result<Duration, AppError> {
    hours
        .checked_mul(3600)
        .filter(|_| hours > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            AppError::ConfigError(format!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                u64::MAX / 3600
            ))
        })
}

fn required<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::ConfigError(format!("{} environment variable not set", name)))
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} has an invalid value: {}", name, raw))),
    }
}
