use std::time::Duration;

use thiserror::Error;

// ─── Defaults ────────────────────────────────────────────────────

const DEFAULT_TARGET_PORT: u16 = 80;
const DEFAULT_CHECK_INTERVAL_SECS: f64 = 5.0;
const DEFAULT_CONNECT_TIMEOUT_SECS: f64 = 3.0;
const DEFAULT_HTTP_PORT: u16 = 8000;

// ─── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

// ─── Config ──────────────────────────────────────────────────────

/// Immutable process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub target_host: String,
    pub target_port: u16,
    pub check_interval: Duration,
    pub connect_timeout: Duration,
    /// Port the HTTP surface listens on.
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target_host = lookup("TARGET_HOST")
            .map(|h| h.trim().to_owned())
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::Missing("TARGET_HOST"))?;

        let target_port = parse_port(&lookup, "TARGET_PORT", DEFAULT_TARGET_PORT)?;
        if target_port == 0 {
            return Err(ConfigError::Invalid {
                name: "TARGET_PORT",
                value: "0".into(),
                reason: "port must be non-zero".into(),
            });
        }

        let check_interval =
            parse_secs(&lookup, "CHECK_INTERVAL_SECONDS", DEFAULT_CHECK_INTERVAL_SECS)?;

        let connect_timeout =
            parse_secs(&lookup, "CONNECT_TIMEOUT_SECONDS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        if connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "CONNECT_TIMEOUT_SECONDS",
                value: lookup("CONNECT_TIMEOUT_SECONDS").unwrap_or_default(),
                reason: "must be at least one nanosecond".into(),
            });
        }

        let http_port = parse_port(&lookup, "PORT", DEFAULT_HTTP_PORT)?;

        Ok(Self {
            target_host,
            target_port,
            check_interval,
            connect_timeout,
            http_port,
        })
    }

    /// `"host:port"`, as shown by `/`, `/health` and the logs.
    pub fn target(&self) -> String {
        format!("{}:{}", self.target_host, self.target_port)
    }
}

fn parse_port<F>(lookup: &F, name: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
            name,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// Parses a non-negative float seconds value that fits in a `Duration`.
fn parse_secs<F>(lookup: &F, name: &'static str, default: f64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(Duration::from_secs_f64(default));
    };
    let invalid = |reason: String| ConfigError::Invalid {
        name,
        value: raw.clone(),
        reason,
    };

    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    if value < 0.0 {
        return Err(invalid("must not be negative".into()));
    }
    // Rejects NaN, infinities and anything past `Duration::MAX`.
    Duration::try_from_secs_f64(value).map_err(|e| invalid(e.to_string()))
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
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_host_is_set() {
        let config = load(&[("TARGET_HOST", "google.com")]).unwrap();

        assert_eq!(config.target_host, "google.com");
        assert_eq!(config.target_port, 80);
        assert_eq!(config.check_interval, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.target(), "google.com:80");
    }

    #[test]
    fn missing_host_is_fatal() {
        let err = load(&[("TARGET_PORT", "443")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TARGET_HOST")));

        let err = load(&[("TARGET_HOST", "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TARGET_HOST")));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("TARGET_HOST", "10.0.0.1"),
            ("TARGET_PORT", "443"),
            ("CHECK_INTERVAL_SECONDS", "0.5"),
            ("CONNECT_TIMEOUT_SECONDS", "1.25"),
            ("PORT", "9100"),
        ])
        .unwrap();

        assert_eq!(config.target_port, 443);
        assert_eq!(config.check_interval, Duration::from_millis(500));
        assert_eq!(config.connect_timeout, Duration::from_millis(1250));
        assert_eq!(config.http_port, 9100);
    }

    #[test]
    fn zero_interval_means_back_to_back() {
        let config = load(&[("TARGET_HOST", "example.com"), ("CHECK_INTERVAL_SECONDS", "0")])
            .unwrap();
        assert_eq!(config.check_interval, Duration::ZERO);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let cases = [
            ("TARGET_PORT", "http"),
            ("TARGET_PORT", "70000"),
            ("TARGET_PORT", "0"),
            ("PORT", "-1"),
            ("CHECK_INTERVAL_SECONDS", "soon"),
            ("CHECK_INTERVAL_SECONDS", "-2"),
            ("CHECK_INTERVAL_SECONDS", "inf"),
            ("CHECK_INTERVAL_SECONDS", "1e30"),
            ("CONNECT_TIMEOUT_SECONDS", "0"),
            ("CONNECT_TIMEOUT_SECONDS", "1e-12"),
            ("CONNECT_TIMEOUT_SECONDS", "1e30"),
            ("CONNECT_TIMEOUT_SECONDS", "NaN"),
            ("CONNECT_TIMEOUT_SECONDS", "-3"),
        ];

        for (name, value) in cases {
            let err = load(&[("TARGET_HOST", "example.com"), (name, value)]).unwrap_err();
            match err {
                ConfigError::Invalid { name: got, .. } => assert_eq!(got, name, "{value}"),
                other => panic!("expected Invalid for {name}={value}, got {other:?}"),
            }
        }
    }
}
