use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;

use crate::finder::{self, FinderError};
use crate::output::Reporter;
use crate::probe::{HttpProber, Probe, ProbeConfig, ProbeError, DEFAULT_TIMEOUT_SECONDS};
use crate::resolver::{self, ConfigError, ProxySelection};
use crate::wordlist::WordlistTier;

/// The only status the bare target may answer with before enumeration starts.
pub const LIVENESS_STATUS: u16 = 200;

#[derive(Clone, Debug)]
pub struct Options {
    pub target: String,
    pub threads: usize,
    /// tier token: `1`, `2`, `3` (or `small`, `medium`, `large`)
    pub wordlist: String,
    pub proxy: ProxySelection,
    pub proxy_pool: Vec<String>,
    pub user_agent: Option<String>,
    pub follow_redirects: bool,
    pub timeout_seconds: u64,
    /// comma separated status codes counted as hits
    pub found_status: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            target: String::new(),
            threads: finder::DEFAULT_THREADS,
            wordlist: "1".to_string(),
            proxy: ProxySelection::None,
            proxy_pool: resolver::default_proxy_pool(),
            user_agent: None,
            follow_redirects: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            found_status: "200".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Finder(#[from] FinderError),

    #[error("target answered {status} instead of {expected}: {url}")]
    TargetDown {
        url: String,
        status: u16,
        expected: u16,
    },

    #[error("target is unreachable: {source}")]
    TargetUnreachable {
        #[source]
        source: ProbeError,
    },

    #[error("wordlist '{tier}' has no paths")]
    EmptyWordlist { tier: WordlistTier },
}

#[derive(Clone, Debug)]
pub struct ScanSummary {
    pub target: String,
    pub tier: WordlistTier,
    pub requests: usize,
    pub hits: Vec<String>,
    pub misses: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

/// A fully resolved, immutable scan. Construction does no network I/O; the
/// user-agent and proxy are fixed here for the whole run.
#[derive(Clone, Debug)]
pub struct Runner {
    target: String,
    tier: WordlistTier,
    paths: Vec<String>,
    threads: usize,
    found_status: HashSet<u16>,
    probe_config: ProbeConfig,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        Self::with_rng(options, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(options: Options, rng: &mut R) -> Result<Self, RunnerError> {
        let target = resolver::normalize_target(&options.target)?;
        let tier = resolver::resolve_tier(&options.wordlist)?;
        let threads = resolver::validate_threads(options.threads)?;
        let timeout = resolver::validate_timeout(options.timeout_seconds)?;
        let found_status = resolver::parse_status_set(&options.found_status)?;
        let proxy = resolver::resolve_proxy(&options.proxy, &options.proxy_pool, rng)?;
        let user_agent = resolver::resolve_user_agent(options.user_agent.as_deref(), rng);

        let paths = tier.paths();
        if paths.is_empty() {
            return Err(RunnerError::EmptyWordlist { tier });
        }

        Ok(Self {
            target,
            tier,
            paths,
            threads,
            found_status,
            probe_config: ProbeConfig {
                user_agent,
                proxy,
                follow_redirects: options.follow_redirects,
                timeout,
            },
        })
    }

    /// Replaces the bundled tier list, e.g. to scan a single path.
    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        let cleaned = paths
            .iter()
            .filter_map(|p| crate::wordlist::clean_entry(p))
            .collect();
        self.paths = crate::utils::dedupe_preserving_order(cleaned);
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn tier(&self) -> WordlistTier {
        self.tier
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn found_status(&self) -> &HashSet<u16> {
        &self.found_status
    }

    pub fn probe_config(&self) -> &ProbeConfig {
        &self.probe_config
    }

    pub fn check_liveness<P: Probe + ?Sized>(&self, probe: &mut P) -> Result<(), RunnerError> {
        match probe.probe(&self.target) {
            Ok(LIVENESS_STATUS) => {
                tracing::info!(url = %self.target, "target is up");
                Ok(())
            }
            Ok(status) => {
                tracing::warn!(url = %self.target, status, "target failed liveness check");
                Err(RunnerError::TargetDown {
                    url: self.target.clone(),
                    status,
                    expected: LIVENESS_STATUS,
                })
            }
            Err(e) => {
                tracing::warn!(url = %self.target, error = %e, "target is unreachable");
                Err(RunnerError::TargetUnreachable { source: e })
            }
        }
    }

    pub fn enumerate_with<P, F, R>(
        &self,
        make_probe: F,
        reporter: &mut R,
    ) -> Result<ScanSummary, RunnerError>
    where
        P: Probe + Send,
        F: FnMut() -> Result<P, ProbeError>,
        R: Reporter + ?Sized,
    {
        let started_at = Instant::now();
        reporter.start();
        let stats = finder::enumerate(
            &self.target,
            &self.paths,
            &self.found_status,
            self.threads,
            make_probe,
            reporter,
        )?;
        reporter.finish();

        Ok(ScanSummary {
            target: self.target.clone(),
            tier: self.tier,
            requests: stats.requests,
            hits: stats.hits,
            misses: stats.misses,
            errors: stats.errors,
            elapsed: started_at.elapsed(),
        })
    }

    /// Liveness check, then enumeration. Nothing is enumerated if the target
    /// is not up.
    pub fn run_with<P, F, R>(
        &self,
        make_probe: F,
        reporter: &mut R,
    ) -> Result<ScanSummary, RunnerError>
    where
        P: Probe + Send,
        F: FnMut() -> Result<P, ProbeError>,
        R: Reporter + ?Sized,
    {
        self.run_observed(make_probe, reporter, |_| {})
    }

    /// Like [`Runner::run_with`], calling `on_live` once the target passed
    /// the liveness check and before the first path is requested.
    pub fn run_observed<P, F, R, L>(
        &self,
        mut make_probe: F,
        reporter: &mut R,
        on_live: L,
    ) -> Result<ScanSummary, RunnerError>
    where
        P: Probe + Send,
        F: FnMut() -> Result<P, ProbeError>,
        R: Reporter + ?Sized,
        L: FnOnce(&Self),
    {
        let mut probe = make_probe()?;
        self.check_liveness(&mut probe)?;
        drop(probe);
        on_live(self);
        self.enumerate_with(make_probe, reporter)
    }

    pub fn run<R: Reporter + ?Sized>(&self, reporter: &mut R) -> Result<ScanSummary, RunnerError> {
        let config = self.probe_config.clone();
        self.run_with(|| HttpProber::new(&config), reporter)
    }
}
