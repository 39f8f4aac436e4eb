use crate::cli::args::CliArgs;
use crate::resolver;

// rejects malformed flag values before anything touches the network
pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(threads) = args.threads {
        resolver::validate_threads(threads).map_err(|e| e.to_string())?;
    }
    if let Some(timeout) = args.timeout {
        resolver::validate_timeout(timeout).map_err(|e| e.to_string())?;
    }
    if let Some(raw) = args.wordlist.as_deref() {
        resolver::resolve_tier(raw).map_err(|e| e.to_string())?;
    }
    if let Some(raw) = args.proxy.as_deref() {
        resolver::parse_proxy(raw).map_err(|e| e.to_string())?;
    }
    if let Some(raw) = args.status.as_deref() {
        resolver::parse_status_set(raw).map_err(|e| e.to_string())?;
    }
    if let Some(url) = args.url.as_deref() {
        resolver::normalize_target(url).map_err(|e| e.to_string())?;
    }
    if args.update && args.no_update {
        return Err("use either --update or --no-update, not both".to_string());
    }
    Ok(())
}
