use std::{env, fmt::Display, ops::RangeInclusive, str::FromStr};
use thiserror::Error;

/// Session lifetimes from one hour to one year.
const TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=24 * 365;
/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

/// Process configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = or_default(&lookup, "ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: or_default(&lookup, "HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 9500)?,
            database_url: required(&lookup, "DATABASE_URL")?,
            database_name: or_default(&lookup, "MONGODB_DATABASE", "food_donation"),
            jwt: JwtSettings {
                secret: required(&lookup, "JWT_SECRET_KEY")?,
                issuer: or_default(&lookup, "JWT_ISSUER", "food-donation-service"),
                audience: or_default(&lookup, "JWT_AUDIENCE", "food-donation-web"),
                ttl_hours: within(
                    "JWT_TTL_HOURS",
                    parse_or(&lookup, "JWT_TTL_HOURS", 24)?,
                    TTL_HOURS_RANGE,
                )?,
            },
            bcrypt_cost: within(
                "BCRYPT_COST",
                parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                BCRYPT_COST_RANGE,
            )?,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            allowed_origins,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn or_default<F>(lookup: &F, key: &'static str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        log::debug!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn within<T>(key: &'static str, value: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("{} is outside {}..={}", value, range.start(), range.end()),
        })
    }
}
