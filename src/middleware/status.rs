use axum::http::{Response, StatusCode};

/// The status code a downstream handler ended up sending.
///
/// Lives for one request only. An `http::Response` starts out as
/// `200 OK`, so a handler that writes a body without ever choosing a
/// status is reported as `200`, matching what goes over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedStatus(StatusCode);

impl CapturedStatus {
    // ---
    pub fn from_response<B>(response: &Response<B>) -> Self {
        CapturedStatus(response.status())
    }

    pub fn code(&self) -> StatusCode {
        self.0
    }

    /// Decimal label value, e.g. `"404"`.
    pub fn label(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for CapturedStatus {
    fn default() -> Self {
        CapturedStatus(StatusCode::OK)
    }
}
