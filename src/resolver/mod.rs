pub mod pools;

use std::collections::HashSet;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::utils;
use crate::wordlist::WordlistTier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid wordlist '{token}', expected 1 (small), 2 (medium) or 3 (large)")]
    InvalidTier { token: String },

    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid proxy '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },

    #[error("invalid status list '{raw}': {reason}")]
    InvalidStatusSet { raw: String, reason: String },

    #[error("invalid thread count {value}, expected a positive integer")]
    InvalidThreads { value: usize },

    #[error("invalid timeout {value}, expected 1 to 3600 seconds")]
    InvalidTimeout { value: u64 },

    #[error("random proxy requested but the proxy pool is empty")]
    EmptyProxyPool,
}

/// How the proxy for a run is chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProxySelection {
    #[default]
    None,
    Explicit(String),
    Random,
}

/// Prepends `https://` when no scheme is given and leaves exactly one
/// trailing slash. Applying it twice yields the same value.
pub fn normalize_target(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidTarget {
        target: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("target is empty"));
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = reqwest::Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid("only http and https targets are supported"));
    }
    if parsed.host_str().map_or(true, |h| h.is_empty()) {
        return Err(invalid("missing host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query strings and fragments are not supported"));
    }

    let mut normalized = with_scheme.trim_end_matches('/').to_string();
    normalized.push('/');
    Ok(normalized)
}

pub fn resolve_tier(token: &str) -> Result<WordlistTier, ConfigError> {
    WordlistTier::parse(token).ok_or_else(|| ConfigError::InvalidTier {
        token: token.to_string(),
    })
}

/// Validates `host:port` (optionally prefixed with `http://` or `https://`)
/// and returns it as a proxy url reqwest understands.
pub fn parse_proxy(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidProxy {
        proxy: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (scheme.to_lowercase(), rest),
        None => ("http".to_string(), trimmed),
    };
    if scheme != "http" && scheme != "https" {
        return Err(invalid("only http and https proxies are supported"));
    }

    let rest = rest.trim_end_matches('/');
    let (host, port) = rest
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;
    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(invalid("malformed host"));
    }
    let port: u16 = port.parse().map_err(|_| invalid("port is not a number"))?;
    if port == 0 {
        return Err(invalid("port must be non-zero"));
    }

    let canonical = format!("{scheme}://{host}:{port}");
    let parsed = reqwest::Url::parse(&canonical).map_err(|e| invalid(&e.to_string()))?;
    if parsed.host_str().map_or(true, |h| h.is_empty()) {
        return Err(invalid("missing host"));
    }
    Ok(canonical)
}

pub fn resolve_proxy<R: Rng + ?Sized>(
    selection: &ProxySelection,
    pool: &[String],
    rng: &mut R,
) -> Result<Option<String>, ConfigError> {
    match selection {
        ProxySelection::None => Ok(None),
        ProxySelection::Explicit(raw) => parse_proxy(raw).map(Some),
        ProxySelection::Random => {
            let picked = pool.choose(rng).ok_or(ConfigError::EmptyProxyPool)?;
            parse_proxy(picked).map(Some)
        }
    }
}

pub fn default_proxy_pool() -> Vec<String> {
    pools::PROXY_POOL.iter().map(|p| p.to_string()).collect()
}

/// An explicit, non-blank user-agent wins; otherwise one is drawn from the
/// built-in pool. The caller keeps the result for the whole run.
pub fn resolve_user_agent<R: Rng + ?Sized>(explicit: Option<&str>, rng: &mut R) -> String {
    if let Some(ua) = explicit.map(str::trim).filter(|ua| !ua.is_empty()) {
        return ua.to_string();
    }
    pools::USER_AGENTS
        .choose(rng)
        .copied()
        .unwrap_or(pools::USER_AGENTS[0])
        .to_string()
}

pub fn parse_status_set(raw: &str) -> Result<HashSet<u16>, ConfigError> {
    utils::parse_u16_set_csv(raw).map_err(|reason| ConfigError::InvalidStatusSet {
        raw: raw.to_string(),
        reason,
    })
}

pub fn validate_threads(value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidThreads { value });
    }
    Ok(value)
}

/// Upper bound for `--timeout`. Larger values overflow the client's deadline.
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

pub fn validate_timeout(seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(ConfigError::InvalidTimeout { value: seconds });
    }
    Ok(Duration::from_secs(seconds))
}
