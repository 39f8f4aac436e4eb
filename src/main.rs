use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = cortnex::app::run_cli() {
        eprintln!("{} {}", "[!] Error:".bold().red(), e);
        exit(1);
    }
}
