//! Runtime settings read from the environment (and `.env`, via `dotenvy`).

use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the statistics service lives and how to query it.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    /// Forwarded as `?year=`; the server picks its own default when unset.
    pub year: Option<u16>,
    /// Geohash precision of the comparison cell, forwarded as `?precision=`.
    pub precision: Option<u8>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            year: None,
            precision: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    /// Reads `RADAR_BASE_URL`, `RADAR_YEAR`, `RADAR_PRECISION`,
    /// `RADAR_TIMEOUT_SECS` and `RADAR_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let base_url = lookup("RADAR_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        Ok(Self {
            base_url,
            year: parse_var(&lookup, "RADAR_YEAR")?,
            precision: parse_var(&lookup, "RADAR_PRECISION")?,
            timeout: parse_var(&lookup, "RADAR_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            connect_timeout: parse_var(&lookup, "RADAR_CONNECT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("RADAR_BASE_URL", "https://radar.example.com/"),
            ("RADAR_YEAR", "2013"),
            ("RADAR_PRECISION", " 7 "),
            ("RADAR_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(settings.base_url, "https://radar.example.com");
        assert_eq!(settings.year, Some(2013));
        assert_eq!(settings.precision, Some(7));
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_value() {
        let err = Settings::from_lookup(lookup(&[("RADAR_YEAR", "last year")])).unwrap_err();
        assert!(err.to_string().contains("RADAR_YEAR"));
    }
}
