use std::fmt::Write;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tracing::level_filters::LevelFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{Reporter, TerminalReporter};
use crate::probe::{HttpProber, Probe, ProbeError, DEFAULT_TIMEOUT_SECONDS};
use crate::resolver::{self, ProxySelection};
use crate::runner::{Options, Runner, RunnerError, ScanSummary};
use crate::utils;

fn print_banner() {
    const BANNER: &str = r#"
   ______           __
  / ____/___  _____/ /_____  ___  _  __
 / /   / __ \/ ___/ __/ __ \/ _ \| |/_/
/ /___/ /_/ / /  / /_/ / / /  __/>  <
\____/\____/_/   \__/_/ /_/\___/_/|_|
"#;
    print!("{}", BANNER.bold().cyan());
    println!(
        "      v{} - admin panel finder\n",
        env!("CARGO_PKG_VERSION")
    );
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn flag_label(arg: &clap::Arg) -> String {
    let short = arg.get_short().map(|c| format!("-{c}, ")).unwrap_or_else(|| "    ".to_string());
    let long = arg.get_long().map(|l| format!("--{l}")).unwrap_or_default();
    let value = if arg.get_action().takes_values() {
        let name = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| name.as_str())
            .unwrap_or("VALUE");
        format!(" <{name}>")
    } else {
        String::new()
    };
    format!("{short}{long}{value}")
}

// grouped by help heading, in declaration order, one aligned line per flag
fn render_custom_help() -> String {
    const LABEL_WIDTH: usize = 30;
    let cmd = CliArgs::command();
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", cmd.get_name(), cmd.get_version().unwrap_or_default());
    if let Some(about) = cmd.get_long_about().or(cmd.get_about()) {
        let _ = writeln!(out, "\n{about}");
    }
    let _ = writeln!(out, "\nUsage: {} -u <URL> [OPTIONS]", cmd.get_name());

    let mut headings: Vec<&str> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        if !headings.contains(&heading) {
            headings.push(heading);
        }
    }

    for heading in headings {
        let _ = writeln!(out, "\n{heading}:");
        let args = cmd
            .get_arguments()
            .filter(|a| !a.is_hide_set() && a.get_help_heading().unwrap_or("Options") == heading);
        for arg in args {
            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<width$} {}",
                flag_label(arg),
                help.trim(),
                width = LABEL_WIDTH
            );
        }
    }

    out
}

#[derive(Clone, Debug)]
struct RunConfig {
    target: Option<String>,
    options: Options,
    verbose: u8,
    no_color: bool,
    no_logo: bool,
    update: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let threads = args
        .threads
        .or(cfg.threads)
        .unwrap_or(crate::finder::DEFAULT_THREADS);
    let wordlist = args
        .wordlist
        .or_else(|| cfg.wordlist.as_ref().map(|v| v.to_csv()))
        .unwrap_or_else(|| "1".to_string());
    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    let found_status = args
        .status
        .or_else(|| cfg.status.as_ref().map(|v| v.to_csv()))
        .unwrap_or_else(|| "200".to_string());

    // an explicit proxy always wins over the random pick
    let random_proxy = args.random_proxy || cfg.random_proxy.unwrap_or(false);
    let proxy = match args.proxy.or(cfg.proxy) {
        Some(p) if !p.trim().is_empty() => ProxySelection::Explicit(p),
        _ if random_proxy => ProxySelection::Random,
        _ => ProxySelection::None,
    };
    let proxy_pool = cfg
        .proxy_pool
        .filter(|pool| !pool.is_empty())
        .unwrap_or_else(resolver::default_proxy_pool);

    let user_agent = args.user_agent.or(cfg.user_agent);
    let follow_redirects = !args.no_redirects && cfg.follow_redirects.unwrap_or(true);

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let no_logo = args.no_logo || cfg.no_logo.unwrap_or(false);

    let target = args.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());

    Ok(RunConfig {
        options: Options {
            target: target.clone().unwrap_or_default(),
            threads,
            wordlist,
            proxy,
            proxy_pool,
            user_agent,
            follow_redirects,
            timeout_seconds,
            found_status,
        },
        target,
        verbose: args.verbose,
        no_color,
        no_logo,
        update: args.update,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_dashboard(runner: &Runner) {
    let probe = runner.probe_config();
    format_kv_line("Target", runner.target());
    format_kv_line(
        "Wordlist",
        &format!("{} ({} paths)", runner.tier(), runner.paths().len()),
    );
    format_kv_line(
        "Threads",
        &crate::finder::effective_workers(runner.threads(), runner.paths().len()).to_string(),
    );
    format_kv_line("Proxy", probe.proxy.as_deref().unwrap_or("none"));
    format_kv_line("UserAgent", &probe.user_agent);
    format_kv_line("Redirects", utils::format_bool(probe.follow_redirects));
    format_kv_line("Timeout", &format!("{}s", probe.timeout.as_secs()));
    format_kv_line("Status", &utils::format_u16_set(runner.found_status()));
    println!();
}

fn print_target_on(runner: &Runner) {
    println!(
        "{} Target On: {}\n",
        "[+]".bold().green(),
        runner.target().green()
    );
    print_dashboard(runner);
    println!("{}\n", "[+] Cortnex, find the dashboard!".bold().green());
}

// liveness, dashboard and enumeration; the probe factory is the only seam
fn scan<P, F, R>(runner: &Runner, make_probe: F, reporter: &mut R) -> Result<ScanSummary, String>
where
    P: Probe + Send,
    F: FnMut() -> Result<P, ProbeError>,
    R: Reporter + ?Sized,
{
    runner
        .run_observed(make_probe, &mut *reporter, print_target_on)
        .map_err(|e| {
            reporter.finish();
            match e {
                RunnerError::TargetDown { .. } | RunnerError::TargetUnreachable { .. } => {
                    format!("please verify your target: {e}")
                }
                e => e.to_string(),
            }
        })
}

fn run(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    if !run.no_logo {
        print_banner();
    }

    if run.update {
        println!(
            "{} self-update is not built in; install the latest release with: cargo install cortnex --force",
            "[*]".bold().blue()
        );
        if run.target.is_none() {
            return Ok(());
        }
    }

    if run.target.is_none() {
        print!("{}", render_custom_help());
        return Err("no target given, use -u/--url".to_string());
    }

    let runner = Runner::new(run.options).map_err(|e| e.to_string())?;
    let mut reporter = TerminalReporter::new(runner.paths().len() as u64, run.verbose)?;
    let probe_config = runner.probe_config().clone();
    let summary = scan(&runner, || HttpProber::new(&probe_config), &mut reporter)?;

    println!();
    println!(
        ":: Completed :: {} found, {} requests, {} errors :: scan took {}s ::",
        summary.hits.len(),
        summary.requests,
        summary.errors,
        summary.elapsed.as_secs()
    );
    Ok(())
}

fn load_run_config_file(args: &CliArgs) -> Result<ConfigFile, String> {
    match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => e.exit(),
        },
    };

    let cfg = load_run_config_file(&args)?;
    let run_config = build_run_config(args, cfg)?;
    init_logging(run_config.verbose);
    run(run_config)
}
