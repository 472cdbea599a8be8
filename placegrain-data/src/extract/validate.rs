//! Value validators shared by the attribute rules.
//!
//! Every function returns `None` for input it cannot accept; none of them
//! fail loudly.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::text::{non_blank, split_tokens};

/// Wikipedia reference such as `en:Prague Castle`.
static WIKI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}:[A-Za-z0-9].*$").expect("valid regex"));

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{4,20}$").expect("valid regex"));

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

const PHONE_CHARACTERS: &str = "+0123456789 -()[]";
const PHONE_SEPARATORS: [char; 6] = [' ', '-', '(', ')', '[', ']'];

/// Absolute `http`/`https` URL; `https://` is assumed when no scheme is given.
pub(crate) fn url(value: &str) -> Option<String> {
    let value = non_blank(value)?;
    let candidate = if SCHEME_RE.is_match(value) {
        value.to_owned()
    } else if value.contains("://") {
        return None;
    } else {
        format!("https://{value}")
    };
    let parsed = Url::parse(&candidate).ok()?;
    let web = matches!(parsed.scheme(), "http" | "https");
    (web && parsed.host_str().is_some_and(|host| !host.is_empty())).then(|| parsed.into())
}

/// Wikipedia article URL for a `xx:Title` reference.
pub(crate) fn wikipedia(value: &str) -> Option<String> {
    let value = value.trim();
    if !WIKI_RE.is_match(value) {
        return None;
    }
    let (language, title) = value.split_once(':')?;
    let title = title.split_whitespace().collect::<Vec<_>>().join("_");
    url(&format!("https://{language}.wikipedia.org/wiki/{title}"))
}

/// Mailbox address.
pub(crate) fn email(value: &str) -> Option<String> {
    let value = non_blank(value)?;
    EMAIL_RE.is_match(value).then(|| value.to_owned())
}

/// Phone number, kept as tagged once it passes the shape checks.
pub(crate) fn phone(value: &str) -> Option<String> {
    let length = value.chars().count();
    if !(5..=30).contains(&length) || !value.chars().all(|c| PHONE_CHARACTERS.contains(c)) {
        return None;
    }
    let stripped: String = value
        .chars()
        .filter(|c| !PHONE_SEPARATORS.contains(c))
        .collect();
    PHONE_RE.is_match(&stripped).then(|| value.to_owned())
}

/// Non-negative integer.
pub(crate) fn count(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Signed integer.
pub(crate) fn integer(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Finite floating-point number.
pub(crate) fn number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Last positive integer run inside free text, e.g. `"up to 40"` → `40`.
pub(crate) fn last_positive_integer(value: &str) -> Option<u32> {
    DIGITS_RE
        .find_iter(value)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .last()
}

/// `;`-separated list; rejected when empty or when any element is blank.
pub(crate) fn list(value: &str) -> Option<Vec<String>> {
    let parts: Vec<&str> = value.split(';').map(str::trim).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(parts.into_iter().map(str::to_owned).collect())
}

/// Tokens of a `;`-separated value, empty ones dropped.
pub(crate) fn tokens(value: &str) -> Vec<&str> {
    split_tokens(value).collect()
}
