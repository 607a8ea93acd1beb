use chrono::Weekday;
use config::ConfigError;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Upper bound for `LOOKBACK_DAYS`
pub const MAX_LOOKBACK_DAYS: i64 = 365;

/// Connection settings for the Cin7 sales order API
#[derive(Debug, Clone)]
pub struct Cin7Config {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub update_batch_size: usize,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Shared secret expected in the `X-Api-Key` header
    pub api_key: String,
    pub cin7: Cin7Config,
    pub retry: RetryPolicy,
    /// Buffer subtracted from the oldest order when querying Cin7
    pub lookback: chrono::Duration,
    /// Days on which incoming batches are acknowledged but not processed
    pub skip_weekdays: Vec<Weekday>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::NotFound(key.to_string()))
        };

        let lookback_days: i64 = parse_or(&lookup, "LOOKBACK_DAYS", 1)?;
        if !(0..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
            return Err(ConfigError::Message(format!(
                "LOOKBACK_DAYS must be between 0 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        let lookback = chrono::Duration::try_days(lookback_days).ok_or_else(|| {
            ConfigError::Message(format!("LOOKBACK_DAYS is out of range: {}", lookback_days))
        })?;

        let defaults = RetryPolicy::default();

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            api_key: required("API_KEY")?,
            cin7: Cin7Config {
                base_url: required("CIN7_API_BASE_URL")?,
                username: required("CIN7_USERNAME")?,
                password: required("CIN7_PASSWORD")?,
                page_size: parse_or(&lookup, "CIN7_PAGE_SIZE", 250)?,
                max_pages: parse_or(&lookup, "CIN7_MAX_PAGES", 40)?,
                update_batch_size: parse_or(&lookup, "CIN7_UPDATE_BATCH_SIZE", 250)?,
                timeout: Duration::from_secs(parse_or(&lookup, "CIN7_TIMEOUT_SECS", 30)?),
            },
            retry: RetryPolicy {
                max_attempts: parse_or(&lookup, "RETRY_MAX_ATTEMPTS", defaults.max_attempts)?,
                initial_delay: parse_millis_or(&lookup, "RETRY_INITIAL_DELAY_MS", defaults.initial_delay)?,
                max_delay: parse_millis_or(&lookup, "RETRY_MAX_DELAY_MS", defaults.max_delay)?,
                ..defaults
            },
            lookback,
            skip_weekdays: parse_weekdays(lookup("SKIP_WEEKDAYS").as_deref().unwrap_or(""))?,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 120)?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Message(format!("{} is invalid: {}", key, e))),
        _ => Ok(default),
    }
}

fn parse_millis_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let millis = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, key, millis).map(Duration::from_millis)
}

/// Comma separated weekday names, e.g. `Sat,Sun`
fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| ConfigError::Message(format!("SKIP_WEEKDAYS has unknown day: {}", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = [
            ("API_KEY", "secret"),
            ("CIN7_API_BASE_URL", "https://api.cin7.com/api/v1/SalesOrders"),
            ("CIN7_USERNAME", "user"),
            ("CIN7_PASSWORD", "pass"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            vars.insert(k.to_string(), v.to_string());
        }
        vars
    }

    #[test]
    fn test_defaults() {
        let vars = env(&[]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.lookback, chrono::Duration::days(1));
        assert!(config.skip_weekdays.is_empty());
        assert_eq!(config.cin7.page_size, 250);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_retry_overrides_keep_default_multiplier() {
        let vars = env(&[("RETRY_MAX_ATTEMPTS", "5"), ("RETRY_INITIAL_DELAY_MS", "50")]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(50));
        assert_eq!(config.retry.max_delay, RetryPolicy::default().max_delay);
        assert_eq!(config.retry.multiplier, RetryPolicy::default().multiplier);
    }

    #[test]
    fn test_lookback_out_of_range_rejected() {
        for raw in ["100000000", "366", "-1", "9223372036854775807"] {
            let vars = env(&[("LOOKBACK_DAYS", raw)]);
            let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
            assert!(matches!(err, ConfigError::Message(_)), "accepted {}", raw);
        }

        let vars = env(&[("LOOKBACK_DAYS", "365")]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.lookback, chrono::Duration::days(MAX_LOOKBACK_DAYS));
    }

    #[test]
    fn test_overrides() {
        let vars = env(&[
            ("LOOKBACK_DAYS", "3"),
            ("SKIP_WEEKDAYS", "Sat, sunday"),
            ("CIN7_PAGE_SIZE", "100"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.lookback, chrono::Duration::days(3));
        assert_eq!(config.skip_weekdays, vec![Weekday::Sat, Weekday::Sun]);
        assert_eq!(config.cin7.page_size, 100);
    }

    #[test]
    fn test_missing_required_value() {
        let mut vars = env(&[]);
        vars.remove("CIN7_PASSWORD");

        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(key) if key == "CIN7_PASSWORD"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let vars = env(&[("LOOKBACK_DAYS", "soon")]);
        assert!(Config::from_lookup(|k| vars.get(k).cloned()).is_err());

        let vars = env(&[("SKIP_WEEKDAYS", "Funday")]);
        assert!(Config::from_lookup(|k| vars.get(k).cloned()).is_err());
    }
}
