use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "cortnex",
    version,
    disable_help_flag = true,
    about = "admin panel finder",
    long_about = "Cortnex looks for administrative login panels on a target host by requesting candidate paths from a bundled wordlist.\n\nExamples:\n  cortnex -u example.com\n  cortnex -u https://example.com/ -t 16 -w 3\n  cortnex -u https://example.com/ --random-proxy --no-redirects\n\nOnly scan hosts you are authorized to test."
)]
pub struct CliArgs {
    #[arg(
        short = 'h',
        long = "help",
        action = ArgAction::Help,
        help_heading = "Output",
        help = "Show this help message and exit."
    )]
    pub help: Option<bool>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v shows misses and errors, -vv debug logs)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "no-logo",
        help_heading = "Output",
        help = "Disable the initial banner."
    )]
    pub no_logo: bool,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "Target URL (e.g. https://www.site_target.com/)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'w',
        long = "wordlist",
        value_name = "TIER",
        help_heading = "Input",
        help = "Wordlist tier: 1 (small), 2 (medium) or 3 (large). Default: 1."
    )]
    pub wordlist: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.cortnex/config.yml when present)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 't',
        long = "threads",
        value_name = "N",
        help_heading = "Performance",
        help = "Number of worker threads. Default: 8."
    )]
    pub threads: Option<usize>,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds, 1 to 3600. Default: 10."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "proxy",
        value_name = "HOST:PORT",
        help_heading = "HTTP",
        help = "Use a proxy to connect to the target URL."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "random-proxy",
        help_heading = "HTTP",
        help = "Use a random proxy from the built-in (or configured) pool."
    )]
    pub random_proxy: bool,

    #[arg(
        long = "user-agent",
        value_name = "UA",
        help_heading = "HTTP",
        help = "Customize the User-Agent. Default: random browser User-Agent."
    )]
    pub user_agent: Option<String>,

    #[arg(
        long = "no-redirects",
        help_heading = "HTTP",
        help = "Do not follow redirects."
    )]
    pub no_redirects: bool,

    #[arg(
        short = 's',
        long = "status",
        value_name = "CODES",
        help_heading = "Matching",
        help = "Status codes reported as found (comma-separated). Default: 200."
    )]
    pub status: Option<String>,

    #[arg(
        long = "update",
        help_heading = "Update",
        help = "Check for a newer release."
    )]
    pub update: bool,

    #[arg(
        long = "no-update",
        help_heading = "Update",
        help = "Disable the update check."
    )]
    pub no_update: bool,
}
