use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const MAX_REDIRECTS: usize = 10;

/// Errors from building a client or from a single exchange.
///
/// A response that completed with any status (including 4xx/5xx) is never an
/// error; only the transport failing is.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("user-agent is not a valid header value: {user_agent}")]
    InvalidUserAgent { user_agent: String },

    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("connection failed: {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("too many redirects: {url}")]
    Redirect { url: String },

    #[error("request failed: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ProbeError {
    fn from_transport(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else if source.is_redirect() {
            Self::Redirect { url }
        } else {
            Self::Request { url, source }
        }
    }
}

/// A single status check against a URL. Workers each own one.
pub trait Probe {
    fn probe(&mut self, url: &str) -> Result<u16, ProbeError>;
}

/// Everything a request needs, fixed for the whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    pub user_agent: String,
    pub proxy: Option<String>,
    pub follow_redirects: bool,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::resolver::pools::USER_AGENTS[0].to_string(),
            proxy: None,
            follow_redirects: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug)]
pub struct HttpProber {
    client: reqwest::blocking::Client,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let mut headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| ProbeError::InvalidUserAgent {
                user_agent: config.user_agent.clone(),
            })?;
        headers.insert(USER_AGENT, user_agent);

        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let mut builder = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .redirect(redirect_policy)
            .timeout(config.timeout)
            .danger_accept_invalid_hostnames(true)
            .danger_accept_invalid_certs(true);

        if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| ProbeError::InvalidProxy {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ProbeError::ClientBuild { source: e })?;
        Ok(Self { client })
    }
}

impl Probe for HttpProber {
    fn probe(&mut self, url: &str) -> Result<u16, ProbeError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProbeError::from_transport(url, e))?;
        let status = resp.status().as_u16();
        tracing::debug!(url, status, "probe completed");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        assert!(HttpProber::new(&ProbeConfig::default()).is_ok());
    }

    #[test]
    fn builds_with_proxy_and_no_redirects() {
        let config = ProbeConfig {
            proxy: Some("http://127.0.0.1:8080".to_string()),
            follow_redirects: false,
            ..ProbeConfig::default()
        };
        assert!(HttpProber::new(&config).is_ok());
    }

    #[test]
    fn rejects_user_agent_with_newline() {
        let config = ProbeConfig {
            user_agent: "bad\nagent".to_string(),
            ..ProbeConfig::default()
        };
        assert!(matches!(
            HttpProber::new(&config),
            Err(ProbeError::InvalidUserAgent { .. })
        ));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let config = ProbeConfig {
            timeout: Duration::from_secs(2),
            ..ProbeConfig::default()
        };
        let mut prober = HttpProber::new(&config).unwrap();
        // port 9 on loopback (discard) is closed on any sane test host
        let err = prober.probe("http://127.0.0.1:9/").unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Connect { .. } | ProbeError::Timeout { .. } | ProbeError::Request { .. }
        ));
    }
}
