use axum::extract::OriginalUri;
use axum::http::{Request, Version};

/// The raw request target of `request`, verbatim from the request line.
///
/// Over HTTP/1.x that is the URI exactly as the client sent it, so an
/// absolute-form target keeps its scheme and authority. HTTP/2 and later
/// carry no request line; there the target is the `:path` pseudo-header,
/// i.e. path plus query.
///
/// Prefers axum's [`OriginalUri`] so a layer applied inside a nested router
/// still sees the target from the request line rather than the stripped one.
pub fn request_target<B>(request: &Request<B>) -> String {
    // ---
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());

    match (request.version(), uri.path_and_query()) {
        (Version::HTTP_09 | Version::HTTP_10 | Version::HTTP_11, _) => uri.to_string(),
        (_, Some(path_and_query)) => path_and_query.as_str().to_string(),
        (_, None) => uri.to_string(),
    }
}

/// Collapse a request target into a bounded-cardinality label.
///
/// Not applied by default. Install it with
/// [`MetricsLayer::with_path_label`](super::MetricsLayer::with_path_label)
/// when raw targets would explode the label space.
///
/// # Normalization Rules
///
/// 1. The query string is dropped
/// 2. Numeric and UUID segments become `:id`
/// 3. A trailing slash is removed
///
/// ```
/// use axum_prom_middleware::normalize_path;
///
/// assert_eq!(normalize_path("/orders/42?expand=items"), "/orders/:id");
/// assert_eq!(
///     normalize_path("/users/550e8400-e29b-41d4-a716-446655440000/cart/"),
///     "/users/:id/cart"
/// );
/// assert_eq!(normalize_path("/"), "/");
/// ```
pub fn normalize_path(target: &str) -> String {
    // ---
    let path = target.split_once('?').map_or(target, |(path, _)| path);
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return "/".to_string();
    }

    path.split('/')
        .map(|segment| {
            if is_numeric(segment) || is_uuid(segment) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

/// 8-4-4-4-12 hex groups.
fn is_uuid(segment: &str) -> bool {
    // ---
    let groups: Vec<&str> = segment.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()))
}
