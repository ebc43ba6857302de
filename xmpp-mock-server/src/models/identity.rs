use regex::Regex;
use std::sync::LazyLock;

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@/\s]+@[^@/\s]+$").expect("Address regex is valid"));

/// Part before the `@`, or the whole identity when there is none.
pub fn local_part(identity: &str) -> &str {
    identity
        .split_once('@')
        .map_or(identity, |(local, _)| local)
}

/// Drops a `/resource` suffix.
pub fn bare(jid: &str) -> &str {
    jid.split_once('/').map_or(jid, |(bare, _)| bare)
}

/// Qualifies bare user names with the server domain and strips resources.
pub fn qualify(name: &str, domain: &str) -> String {
    let name = bare(name.trim());
    if name.contains('@') {
        name.to_string()
    } else {
        format!("{name}@{domain}")
    }
}

pub fn is_address(identity: &str) -> bool {
    ADDRESS.is_match(identity)
}
