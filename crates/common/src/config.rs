use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// Ratio by which a batch is enlarged to make up for items the filter drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverFetch {
    pub numerator: usize,
    pub denominator: usize,
}

impl OverFetch {
    pub fn new(numerator: usize, denominator: usize) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            anyhow::bail!("over-fetch ratio must be positive, got {}/{}", numerator, denominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// `ceil(missing * numerator / denominator)`, never zero while something is missing.
    pub fn batch_size(&self, missing: usize) -> usize {
        if missing == 0 {
            return 0;
        }
        let scaled = missing.saturating_mul(self.numerator);
        scaled.div_ceil(self.denominator).max(1)
    }
}

impl Default for OverFetch {
    fn default() -> Self {
        Self {
            numerator: 5,
            denominator: 4,
        }
    }
}

impl fmt::Display for OverFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for OverFetch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (num, den) = s
            .split_once('/')
            .with_context(|| format!("expected NUM/DEN, got {:?}", s))?;
        let numerator = num.trim().parse().context("invalid over-fetch numerator")?;
        let denominator = den.trim().parse().context("invalid over-fetch denominator")?;
        Self::new(numerator, denominator)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub num_stories: usize,
    pub api_base: String,
    pub cache_ttl: Duration,
    /// `None` turns the background warmer off.
    pub refresh_interval: Option<Duration>,
    pub fetch_timeout: Duration,
    pub over_fetch: OverFetch,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            num_stories: 30,
            api_base: DEFAULT_API_BASE.to_string(),
            cache_ttl: Duration::from_secs(6),
            refresh_interval: Some(Duration::from_secs(3)),
            fetch_timeout: Duration::from_secs(10),
            over_fetch: OverFetch::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let refresh_secs: u64 = parse_or(&lookup, "REFRESH_INTERVAL_SECS", 3)?;
        let refresh_interval = (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs));

        let api_base = lookup("HN_API_BASE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base);

        let cache_ttl_secs: u64 = parse_or(&lookup, "CACHE_TTL_SECS", 6)?;
        if cache_ttl_secs == 0 {
            anyhow::bail!("CACHE_TTL_SECS must be at least 1");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            num_stories: parse_or(&lookup, "NUM_STORIES", defaults.num_stories)?,
            api_base,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            refresh_interval,
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 10)?),
            over_fetch: parse_or(&lookup, "OVER_FETCH", defaults.over_fetch)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has invalid value {:?}: {}", key, raw, e)),
        _ => Ok(default),
    }
}
