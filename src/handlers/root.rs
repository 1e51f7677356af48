use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Instrumented demo service
Version: {version}

Available endpoints:
  - GET    /orders            - List orders
  - POST   /orders            - Add an order
  - GET    /orders/{{id}}       - Fetch an order by id
  - GET    /health            - Health check
  - GET    /metrics           - Prometheus text exposition of this service's series

Every request (including this one) is counted by path and status, and timed.
"#
    )
}
