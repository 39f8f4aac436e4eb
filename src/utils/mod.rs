use std::collections::HashSet;

pub fn parse_u16_set_csv(value: &str) -> Result<HashSet<u16>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("list is empty".to_string());
    }
    let mut out = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let code: u16 = item
            .parse()
            .map_err(|_| format!("invalid status code '{item}'"))?;
        if !(100..=599).contains(&code) {
            return Err(format!("status code '{item}' is out of range"));
        }
        out.insert(code);
    }
    if out.is_empty() {
        return Err("list is empty".to_string());
    }
    Ok(out)
}

/// Renders a status set sorted, for the dashboard and error messages.
pub fn format_u16_set(set: &HashSet<u16>) -> String {
    let mut codes: Vec<u16> = set.iter().copied().collect();
    codes.sort_unstable();
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Keeps the first occurrence of every word, in input order.
pub fn dedupe_preserving_order(words: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(words.len());
    words
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

pub fn join_url(base: &str, path: &str) -> String {
    let mut url = String::with_capacity(base.len() + path.len());
    url.push_str(base);
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(path.trim_start_matches('/'));
    url
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
