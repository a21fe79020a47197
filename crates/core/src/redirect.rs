//! Same-origin checks for post-login and post-submit redirects.
//!
//! A target is resolved against the origin of the current request (so a
//! relative path always stays on this host) and then accepted only when the
//! resulting scheme is `http`/`https` and its network location is exactly the
//! request host.

/// Schemes a redirect may use.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Returns `true` when `target` stays on `host` after resolution.
///
/// `host` is the network location of the current request as sent by the
/// client (`Host` header), including any port. Targets carrying control
/// characters are refused outright, since they cannot be sent back in a
/// `Location` header.
pub fn is_safe_url(target: &str, host: &str) -> bool {
    if target.chars().any(|c| c.is_ascii_control()) {
        return false;
    }
    let target = normalize(target);

    let (scheme, rest, explicit) = match split_scheme(&target) {
        Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest, true),
        // Relative reference: inherits the request origin's scheme. Unlike a
        // browser's resolver, `http:/path` is not joined onto the host.
        None => ("http".to_string(), target.as_str(), false),
    };

    if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
        return false;
    }

    match rest.strip_prefix("//") {
        Some(authority) => network_location(authority) == host,
        // An explicit scheme with no authority does not inherit the host.
        None => !explicit,
    }
}

/// Pick the first usable redirect target: the explicit `next` parameter,
/// then the `Referer` header. Empty and unsafe candidates are skipped.
pub fn redirect_target(next: Option<&str>, referrer: Option<&str>, host: &str) -> Option<String> {
    [next, referrer]
        .into_iter()
        .flatten()
        .filter(|candidate| !candidate.is_empty())
        .find(|candidate| is_safe_url(candidate, host))
        .map(str::to_string)
}

/// Strip surrounding spaces and treat backslashes as path separators the
/// way browsers do.
fn normalize(target: &str) -> String {
    target
        .trim_matches(' ')
        .chars()
        .map(|c| if c == '\\' { '/' } else { c })
        .collect()
}

/// Split `scheme:rest` if the prefix is a syntactically valid scheme.
fn split_scheme(target: &str) -> Option<(&str, &str)> {
    let colon = target.find(':')?;
    let candidate = &target[..colon];

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }

    Some((candidate, &target[colon + 1..]))
}

/// The authority component: everything up to the first `/`, `?` or `#`.
fn network_location(after_slashes: &str) -> &str {
    let end = after_slashes
        .find(['/', '?', '#'])
        .unwrap_or(after_slashes.len());
    &after_slashes[..end]
}
