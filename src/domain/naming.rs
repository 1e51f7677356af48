//! Service name normalization.
//!
//! Every series a registry owns is prefixed with an identifier derived from
//! the human-readable service name, so `"Order Service"` ends up exporting
//! `order_service_http_requests_total` and friends. The derivation is a pure
//! function: the same input always yields the same prefix.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// An uppercase letter starting a lowercase word, preceded by anything.
/// Splits acronym-to-word transitions: `HTTPServer` -> `HTTP_Server`.
static MATCH_FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("static regex is valid"));

/// A lowercase letter or digit followed by an uppercase letter.
/// Splits word-to-word and word-to-acronym transitions: `myHTTP` -> `my_HTTP`.
static MATCH_ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("static regex is valid"));

/// Convert an arbitrary service name into a lowercase, underscore-separated
/// identifier usable as a Prometheus metric-name prefix.
///
/// Case boundaries become underscores, then the result is lowercased. Any
/// character outside `[a-z0-9_]` (spaces, punctuation, non-ASCII) is folded
/// into a single underscore, and leading/trailing underscores are trimmed.
/// A result starting with a digit gets a leading underscore so the metric
/// names built from it stay valid.
///
/// The function is total and idempotent.
///
/// ```
/// use axum_prom_middleware::domain::to_snake_case;
///
/// assert_eq!(to_snake_case("MyCoolService"), "my_cool_service");
/// assert_eq!(to_snake_case("HTTPServer"), "http_server");
/// assert_eq!(to_snake_case("Order Service"), "order_service");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(name: &str) -> String {
    // ---
    let snake = MATCH_FIRST_CAP.replace_all(name, "${1}_${2}");
    let snake = MATCH_ALL_CAP.replace_all(&snake, "${1}_${2}");
    sanitize(&snake.to_lowercase())
}

/// Fold illegal characters into single underscores and trim the edges.
fn sanitize(lowered: &str) -> String {
    // ---
    let mut out = String::with_capacity(lowered.len());
    let mut pending_sep = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Normalized service name used as the namespace of all three series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceIdentifier(String);

impl ServiceIdentifier {
    // ---
    pub fn new(service_name: &str) -> Self {
        ServiceIdentifier(to_snake_case(service_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a fully qualified series name: `{identifier}_{suffix}`.
    pub fn metric_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.0, suffix)
    }
}

impl fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
