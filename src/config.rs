// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! validated [`Config`] built from them. Configuration is loaded once at
//! startup; any invalid value aborts the process before it serves traffic.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APP_ENV` | Deployment environment (`dev`, `test`, `prod`) | `dev` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port (>= 1000) | `3000` |
//! | `CHALLENGE_EXP_SECONDS` | Challenge time-to-live in seconds (decimal) | `60` (`0.05` in `test`) |
//! | `CHALLENGE_SWEEP_INTERVAL_SECS` | Expired challenge sweep period, `0` disables | `60` |
//! | `JWT_AT_SECRET_KEY` | Access token signing secret (>= 16 chars) | Required for production |
//! | `JWT_RT_SECRET_KEY` | Refresh token signing secret (>= 16 chars) | Required for production |
//! | `JWT_AT_EXP_IN` | Access token lifetime (`15m`, `1h`, ...) | `1h` |
//! | `JWT_RT_EXP_IN` | Refresh token lifetime | `24h` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const APP_ENV_ENV: &str = "APP_ENV";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Challenge time-to-live, in (possibly fractional) seconds.
pub const CHALLENGE_EXP_SECONDS_ENV: &str = "CHALLENGE_EXP_SECONDS";

/// Period of the background sweep that drops expired challenges nobody
/// came back for. `0` turns the sweeper off.
pub const CHALLENGE_SWEEP_INTERVAL_ENV: &str = "CHALLENGE_SWEEP_INTERVAL_SECS";

pub const JWT_AT_SECRET_ENV: &str = "JWT_AT_SECRET_KEY";
pub const JWT_RT_SECRET_ENV: &str = "JWT_RT_SECRET_KEY";
pub const JWT_AT_EXP_ENV: &str = "JWT_AT_EXP_IN";
pub const JWT_RT_EXP_ENV: &str = "JWT_RT_EXP_IN";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const MIN_PORT: u16 = 1000;
const DEFAULT_CHALLENGE_TTL_SECS: f64 = 60.0;
const TEST_CHALLENGE_TTL_SECS: f64 = 0.05;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_ACCESS_TTL: &str = "1h";
const DEFAULT_REFRESH_TTL: &str = "24h";
const MIN_SECRET_LEN: usize = 16;

/// Signing secret used outside production when none is configured.
const DEV_SECRET: &str = "verysecretkey!!!";

/// Configuration errors. Always fatal at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Dev,
    Test,
    Prod,
}

impl AppEnv {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dev" | "development" => Some(AppEnv::Dev),
            "test" => Some(AppEnv::Test),
            "prod" | "production" => Some(AppEnv::Prod),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// JWT signing material and token lifetimes.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub bind_addr: SocketAddr,
    pub challenge_ttl: Duration,
    /// `None` when the sweeper is disabled.
    pub sweep_interval: Option<Duration>,
    pub tokens: TokenConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_env = match get(APP_ENV_ENV) {
            Some(raw) => AppEnv::parse(&raw).ok_or_else(|| {
                invalid(APP_ENV_ENV, format!("expected dev, test or prod, got '{raw}'"))
            })?,
            None => AppEnv::Dev,
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|e| invalid(HOST_ENV, format!("{e}: {host}")))?;

        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| invalid(PORT_ENV, format!("{e}: {raw}")))?,
            None => DEFAULT_PORT,
        };
        if port < MIN_PORT {
            return Err(invalid(PORT_ENV, format!("must be >= {MIN_PORT}, got {port}")));
        }

        let challenge_ttl = match get(CHALLENGE_EXP_SECONDS_ENV) {
            Some(raw) => parse_positive_seconds(CHALLENGE_EXP_SECONDS_ENV, &raw)?,
            None if app_env == AppEnv::Test => Duration::from_secs_f64(TEST_CHALLENGE_TTL_SECS),
            None => Duration::from_secs_f64(DEFAULT_CHALLENGE_TTL_SECS),
        };

        let sweep_secs = match get(CHALLENGE_SWEEP_INTERVAL_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(CHALLENGE_SWEEP_INTERVAL_ENV, format!("{e}: {raw}")))?,
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        let access_secret = load_secret(&get, JWT_AT_SECRET_ENV, app_env)?;
        let refresh_secret = load_secret(&get, JWT_RT_SECRET_ENV, app_env)?;

        let access_raw = get(JWT_AT_EXP_ENV).unwrap_or_else(|| DEFAULT_ACCESS_TTL.to_string());
        let access_ttl = parse_duration(&access_raw)
            .map_err(|reason| invalid(JWT_AT_EXP_ENV, reason))?;
        let refresh_raw = get(JWT_RT_EXP_ENV).unwrap_or_else(|| DEFAULT_REFRESH_TTL.to_string());
        let refresh_ttl = parse_duration(&refresh_raw)
            .map_err(|reason| invalid(JWT_RT_EXP_ENV, reason))?;

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(invalid(
                    LOG_FORMAT_ENV,
                    format!("expected json or pretty, got '{other}'"),
                ))
            }
        };

        Ok(Config {
            app_env,
            bind_addr: SocketAddr::new(ip, port),
            challenge_ttl,
            sweep_interval,
            tokens: TokenConfig {
                access_secret,
                refresh_secret,
                access_ttl,
                refresh_ttl,
            },
            log_format,
        })
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue(key.to_string(), reason.into())
}

fn load_secret<G>(get: &G, key: &str, app_env: AppEnv) -> Result<String, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secret = match get(key) {
        Some(secret) => secret,
        None if app_env == AppEnv::Prod => return Err(ConfigError::MissingVar(key.to_string())),
        None => DEV_SECRET.to_string(),
    };
    if secret.chars().count() < MIN_SECRET_LEN {
        return Err(invalid(
            key,
            format!("must be at least {MIN_SECRET_LEN} characters"),
        ));
    }
    Ok(secret)
}

fn parse_positive_seconds(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e| invalid(key, format!("{e}: {raw}")))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid(key, format!("must be a positive number, got {raw}")));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| invalid(key, e.to_string()))
}

/// Parse a duration string such as `90`, `500ms`, `15m`, `1h`, `7d` or `2w`.
///
/// A bare integer is read as seconds. Zero is rejected.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let value = raw.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);

    if digits.is_empty() {
        return Err(format!("expected a number followed by a unit, got '{raw}'"));
    }
    let amount: u64 = digits
        .parse()
        .map_err(|e| format!("{e}: {raw}"))?;

    let unit_secs: u64 = match unit.trim() {
        "ms" => {
            return match amount {
                0 => Err(format!("duration must be positive, got '{raw}'")),
                ms => Ok(Duration::from_millis(ms)),
            }
        }
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        other => return Err(format!("unknown duration unit '{other}' in '{raw}'")),
    };

    let secs = amount
        .checked_mul(unit_secs)
        .ok_or_else(|| format!("duration overflows: '{raw}'"))?;
    if secs == 0 {
        return Err(format!("duration must be positive, got '{raw}'"));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_in_dev() {
        let config = load(&[]).unwrap();
        assert_eq!(config.app_env, AppEnv::Dev);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.challenge_ttl, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(60)));
        assert_eq!(config.tokens.access_ttl, Duration::from_secs(3600));
        assert_eq!(config.tokens.refresh_ttl, Duration::from_secs(86_400));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_shortens_challenge_ttl() {
        let config = load(&[(APP_ENV_ENV, "test")]).unwrap();
        assert_eq!(config.challenge_ttl, Duration::from_millis(50));
    }

    #[test]
    fn explicit_challenge_ttl_wins() {
        let config = load(&[(APP_ENV_ENV, "test"), (CHALLENGE_EXP_SECONDS_ENV, "2.5")]).unwrap();
        assert_eq!(config.challenge_ttl, Duration::from_millis(2500));
    }

    #[test]
    fn rejects_non_positive_challenge_ttl() {
        for raw in ["0", "-1", "abc", "NaN"] {
            let err = load(&[(CHALLENGE_EXP_SECONDS_ENV, raw)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue(ref k, _) if k == CHALLENGE_EXP_SECONDS_ENV),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn prod_requires_secrets() {
        let err = load(&[(APP_ENV_ENV, "prod")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(JWT_AT_SECRET_ENV.to_string()));

        let err = load(&[
            (APP_ENV_ENV, "prod"),
            (JWT_AT_SECRET_ENV, "access-secret-0123456789"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(JWT_RT_SECRET_ENV.to_string()));

        let config = load(&[
            (APP_ENV_ENV, "prod"),
            (JWT_AT_SECRET_ENV, "access-secret-0123456789"),
            (JWT_RT_SECRET_ENV, "refresh-secret-0123456789"),
        ])
        .unwrap();
        assert_eq!(config.tokens.access_secret, "access-secret-0123456789");
        assert_eq!(config.tokens.refresh_secret, "refresh-secret-0123456789");
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = load(&[(JWT_RT_SECRET_ENV, "short")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == JWT_RT_SECRET_ENV));
    }

    #[test]
    fn low_port_is_rejected() {
        let err = load(&[(PORT_ENV, "80")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == PORT_ENV));
    }

    #[test]
    fn invalid_host_is_rejected() {
        let err = load(&[(HOST_ENV, "not a host")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == HOST_ENV));
    }

    #[test]
    fn zero_sweep_interval_disables_sweeper() {
        let config = load(&[(CHALLENGE_SWEEP_INTERVAL_ENV, "0")]).unwrap();
        assert!(config.sweep_interval.is_none());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert_eq!(load(&[(LOG_FORMAT_ENV, "json")]).unwrap().log_format, LogFormat::Json);
        assert!(load(&[(LOG_FORMAT_ENV, "xml")]).is_err());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let config = load(&[]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(DEV_SECRET));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("7d").unwrap(), Duration::from_secs(604_800));
        assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(1_209_600));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("0h").is_err());
        assert!(parse_duration("10y").is_err());
        assert!(parse_duration("-5m").is_err());
    }
}
