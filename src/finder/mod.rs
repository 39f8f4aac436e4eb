use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;

use thiserror::Error;

use crate::output::Reporter;
use crate::probe::{Probe, ProbeError};
use crate::utils;

pub const DEFAULT_THREADS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// status is in the found set
    Hit(u16),
    Miss(u16),
    /// transport failure, the path is dropped
    Error(String),
}

// one per candidate path, sent from the workers to the reporter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    pub path: String,
    pub url: String,
    pub outcome: Outcome,
}

impl ProbeResult {
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, Outcome::Hit(_))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    pub requests: usize,
    pub hits: Vec<String>,
    pub misses: usize,
    pub errors: usize,
}

impl EnumerationStats {
    fn record(&mut self, result: &ProbeResult) {
        self.requests += 1;
        match &result.outcome {
            Outcome::Hit(_) => self.hits.push(result.url.clone()),
            Outcome::Miss(_) => self.misses += 1,
            Outcome::Error(_) => self.errors += 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("failed to create a worker client: {source}")]
    WorkerSetup {
        #[from]
        source: ProbeError,
    },

    #[error("{count} worker thread(s) panicked")]
    WorkerPanicked { count: usize },
}

pub fn classify(status: u16, found: &HashSet<u16>) -> Outcome {
    if found.contains(&status) {
        Outcome::Hit(status)
    } else {
        Outcome::Miss(status)
    }
}

/// Number of workers actually started: at least one, never more than there
/// are paths to hand out.
pub fn effective_workers(threads: usize, paths: usize) -> usize {
    threads.max(1).min(paths.max(1))
}

/// Requests `target + path` for every path exactly once across a fixed pool
/// of worker threads and streams each result to `reporter` as it arrives.
///
/// Every worker gets its own probe from `make_probe`; all probes are created
/// before the first request so a broken client setup fails the run up front.
/// Results arrive in no particular order.
pub fn enumerate<P, F, R>(
    target: &str,
    paths: &[String],
    found: &HashSet<u16>,
    threads: usize,
    mut make_probe: F,
    reporter: &mut R,
) -> Result<EnumerationStats, FinderError>
where
    P: Probe + Send,
    F: FnMut() -> Result<P, ProbeError>,
    R: Reporter + ?Sized,
{
    let workers = effective_workers(threads, paths.len());
    let mut probes = Vec::with_capacity(workers);
    for _ in 0..workers {
        probes.push(make_probe()?);
    }

    let (mut job_tx, job_rx) = spmc::channel::<String>();
    for path in paths {
        if job_tx.send(path.clone()).is_err() {
            break;
        }
    }
    // closing the queue lets idle workers see it is exhausted
    drop(job_tx);

    let (result_tx, result_rx) = mpsc::channel::<ProbeResult>();
    let mut stats = EnumerationStats::default();

    tracing::info!(base = target, workers, paths = paths.len(), "enumeration started");

    let panicked = thread::scope(|scope| {
        let handles = probes
            .into_iter()
            .enumerate()
            .map(|(id, mut probe)| {
                let rx = job_rx.clone();
                let tx = result_tx.clone();
                scope.spawn(move || run_worker(id, &mut probe, rx, tx, target, found))
            })
            .collect::<Vec<_>>();
        drop(result_tx);
        drop(job_rx);

        for result in result_rx {
            stats.record(&result);
            reporter.report(&result);
        }

        handles
            .into_iter()
            .map(|h| h.join())
            .filter(Result::is_err)
            .count()
    });

    if panicked > 0 {
        return Err(FinderError::WorkerPanicked { count: panicked });
    }

    tracing::info!(
        requests = stats.requests,
        hits = stats.hits.len(),
        errors = stats.errors,
        "enumeration finished"
    );
    Ok(stats)
}

fn run_worker<P: Probe>(
    id: usize,
    probe: &mut P,
    rx: spmc::Receiver<String>,
    tx: mpsc::Sender<ProbeResult>,
    target: &str,
    found: &HashSet<u16>,
) {
    while let Ok(path) = rx.recv() {
        let url = utils::join_url(target, &path);
        let outcome = match probe.probe(&url) {
            Ok(status) => classify(status, found),
            Err(e) => {
                tracing::debug!(worker = id, url = %url, error = %e, "probe failed");
                Outcome::Error(e.to_string())
            }
        };
        if tx.send(ProbeResult { path, url, outcome }).is_err() {
            break;
        }
    }
}
