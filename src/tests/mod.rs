use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::finder::{self, Outcome, ProbeResult};
use crate::output::Reporter;
use crate::probe::{Probe, ProbeError};
use crate::runner::{Options, Runner, RunnerError};

const TARGET: &str = "https://example.com/";

// answers from a fixed table and records every url it was asked for
#[derive(Clone, Default)]
struct ScriptedProbe {
    calls: Arc<Mutex<Vec<String>>>,
    statuses: Arc<HashMap<String, u16>>,
    failing: Arc<HashSet<String>>,
    fallback: u16,
}

impl ScriptedProbe {
    fn new(statuses: Vec<(String, u16)>, failing: Vec<String>, fallback: u16) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            statuses: Arc::new(statuses.into_iter().collect()),
            failing: Arc::new(failing.into_iter().collect()),
            fallback,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Probe for ScriptedProbe {
    fn probe(&mut self, url: &str) -> Result<u16, ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(ProbeError::Timeout {
                url: url.to_string(),
            });
        }
        Ok(self.statuses.get(url).copied().unwrap_or(self.fallback))
    }
}

fn paths(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn url(path: &str) -> String {
    format!("{TARGET}{path}")
}

fn hit_urls(results: &[ProbeResult]) -> HashSet<String> {
    results
        .iter()
        .filter(|r| r.is_hit())
        .map(|r| r.url.clone())
        .collect()
}

#[test]
fn every_path_is_probed_exactly_once() {
    let words: Vec<String> = (0..200).map(|i| format!("panel{i}/")).collect();
    let probe = ScriptedProbe::new(vec![], vec![], 404);
    let mut results: Vec<ProbeResult> = Vec::new();

    let stats = finder::enumerate(
        TARGET,
        &words,
        &HashSet::from([200]),
        8,
        || Ok(probe.clone()),
        &mut results,
    )
    .unwrap();

    let mut calls = probe.calls();
    calls.sort();
    let mut expected: Vec<String> = words.iter().map(|w| url(w)).collect();
    expected.sort();
    assert_eq!(calls, expected);
    assert_eq!(stats.requests, words.len());
    assert_eq!(results.len(), words.len());
}

#[test]
fn only_found_statuses_are_hits() {
    let words = paths(&["admin/", "login.php", "wp-admin/", "panel/", "cpanel/"]);
    let probe = ScriptedProbe::new(
        vec![(url("admin/"), 200), (url("wp-admin/"), 200)],
        vec![],
        404,
    );
    let mut results: Vec<ProbeResult> = Vec::new();

    let stats = finder::enumerate(
        TARGET,
        &words,
        &HashSet::from([200]),
        3,
        || Ok(probe.clone()),
        &mut results,
    )
    .unwrap();

    assert_eq!(
        hit_urls(&results),
        HashSet::from([url("admin/"), url("wp-admin/")])
    );
    assert_eq!(stats.hits.len(), 2);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.errors, 0);
}

#[test]
fn transport_error_does_not_abort_the_run() {
    let words = paths(&["admin/", "login.php", "panel/"]);
    let probe = ScriptedProbe::new(vec![(url("panel/"), 200)], vec![url("login.php")], 200);
    let mut results: Vec<ProbeResult> = Vec::new();

    let stats = finder::enumerate(
        TARGET,
        &words,
        &HashSet::from([200]),
        2,
        || Ok(probe.clone()),
        &mut results,
    )
    .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(stats.errors, 1);
    assert!(!hit_urls(&results).contains(&url("login.php")));
    assert!(results
        .iter()
        .any(|r| r.path == "login.php" && matches!(r.outcome, Outcome::Error(_))));
    assert_eq!(hit_urls(&results), HashSet::from([url("admin/"), url("panel/")]));
}

#[test]
fn thread_count_does_not_change_hits() {
    let words: Vec<String> = crate::wordlist::WordlistTier::Medium.paths();
    let statuses: Vec<(String, u16)> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (url(w), if i % 7 == 0 { 200 } else if i % 11 == 0 { 403 } else { 404 }))
        .collect();
    let found = HashSet::from([200, 403]);

    let single = ScriptedProbe::new(statuses.clone(), vec![], 404);
    let mut single_results: Vec<ProbeResult> = Vec::new();
    finder::enumerate(TARGET, &words, &found, 1, || Ok(single.clone()), &mut single_results)
        .unwrap();

    let pooled = ScriptedProbe::new(statuses.clone(), vec![], 404);
    let mut pooled_results: Vec<ProbeResult> = Vec::new();
    finder::enumerate(TARGET, &words, &found, 8, || Ok(pooled.clone()), &mut pooled_results)
        .unwrap();

    assert!(!hit_urls(&single_results).is_empty());
    assert_eq!(hit_urls(&single_results), hit_urls(&pooled_results));
    assert_eq!(single.calls().len(), pooled.calls().len());
}

#[test]
fn each_worker_gets_its_own_probe() {
    let words = paths(&["a/", "b/", "c/", "d/", "e/", "f/"]);
    let probe = ScriptedProbe::new(vec![], vec![], 404);
    let mut built = 0usize;
    let mut results: Vec<ProbeResult> = Vec::new();

    finder::enumerate(
        TARGET,
        &words,
        &HashSet::from([200]),
        4,
        || {
            built += 1;
            Ok(probe.clone())
        },
        &mut results,
    )
    .unwrap();

    assert_eq!(built, 4);
}

struct Streaming {
    seen: usize,
}

impl Reporter for Streaming {
    fn report(&mut self, result: &ProbeResult) {
        self.seen += 1;
        assert!(result.url.starts_with(TARGET));
    }
}

#[test]
fn reporter_sees_every_result() {
    let words = paths(&["admin/", "login/", "panel/"]);
    let probe = ScriptedProbe::new(vec![], vec![], 200);
    let mut reporter = Streaming { seen: 0 };
    finder::enumerate(
        TARGET,
        &words,
        &HashSet::from([200]),
        2,
        || Ok(probe.clone()),
        &mut reporter,
    )
    .unwrap();
    assert_eq!(reporter.seen, 3);
}

fn runner() -> Runner {
    Runner::new(Options {
        target: "example.com".to_string(),
        threads: 4,
        ..Options::default()
    })
    .unwrap()
    .with_paths(paths(&["admin/", "login.php", "dashboard/"]))
}

#[test]
fn failed_liveness_stops_before_enumeration() {
    let probe = ScriptedProbe::new(vec![(TARGET.to_string(), 503)], vec![], 200);
    let mut results: Vec<ProbeResult> = Vec::new();

    let err = runner()
        .run_with(|| Ok(probe.clone()), &mut results)
        .unwrap_err();

    assert!(matches!(err, RunnerError::TargetDown { status: 503, .. }));
    assert_eq!(probe.calls(), vec![TARGET.to_string()]);
    assert!(results.is_empty());
}

#[test]
fn unreachable_target_stops_before_enumeration() {
    let probe = ScriptedProbe::new(vec![], vec![TARGET.to_string()], 200);
    let mut results: Vec<ProbeResult> = Vec::new();

    let err = runner()
        .run_with(|| Ok(probe.clone()), &mut results)
        .unwrap_err();

    assert!(matches!(err, RunnerError::TargetUnreachable { .. }));
    assert_eq!(probe.calls().len(), 1);
}

#[test]
fn live_target_is_enumerated() {
    let probe = ScriptedProbe::new(
        vec![(TARGET.to_string(), 200), (url("dashboard/"), 200)],
        vec![],
        404,
    );
    let mut results: Vec<ProbeResult> = Vec::new();

    let summary = runner()
        .run_with(|| Ok(probe.clone()), &mut results)
        .unwrap();

    assert_eq!(summary.target, TARGET);
    assert_eq!(summary.requests, 3);
    assert_eq!(summary.hits, vec![url("dashboard/")]);
    // one liveness request plus one per path
    assert_eq!(probe.calls().len(), 4);
}

#[test]
fn invalid_configuration_sends_nothing() {
    let probe = ScriptedProbe::new(vec![], vec![], 200);
    let err = Runner::new(Options {
        target: "example.com".to_string(),
        wordlist: "x".to_string(),
        ..Options::default()
    })
    .unwrap_err();

    assert!(matches!(err, RunnerError::Config(_)));
    assert!(probe.calls().is_empty());
}
