pub mod app;
pub mod cli;
pub mod config;
pub mod finder;
pub mod output;
pub mod probe;
pub mod resolver;
pub mod runner;
pub mod utils;
pub mod wordlist;

#[cfg(test)]
mod tests;
