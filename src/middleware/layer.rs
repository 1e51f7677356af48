use super::path::request_target;
use super::status::CapturedStatus;
use crate::infrastructure::metrics::prom::MetricsRegistryPtr;
use axum::http::{Request, Response};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Maps a raw request target to the `path` label value.
pub type PathLabelFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Applies [`MetricsService`] to every service it wraps.
///
/// Built once per registry by [`crate::new`] and reusable across any number
/// of handler chains; every wrapped service reports into the same registry.
///
/// # Example
///
/// ```
/// use axum::{routing::get, Router};
///
/// let (metrics, layer) = axum_prom_middleware::new("Order Service").unwrap();
/// let app: Router = Router::new()
///     .route("/orders", get(|| async { "[]" }))
///     .layer(layer);
/// # let _ = (metrics, app);
/// ```
#[derive(Clone)]
pub struct MetricsLayer {
    metrics: MetricsRegistryPtr,
    path_label: Option<PathLabelFn>,
}

impl MetricsLayer {
    // ---
    pub fn new(metrics: MetricsRegistryPtr) -> Self {
        Self {
            metrics,
            path_label: None,
        }
    }

    /// Label requests with `f(raw_target)` instead of the raw target.
    ///
    /// The default raw-target labelling is unbounded in cardinality under
    /// parameterized URLs; [`normalize_path`](super::normalize_path) is a
    /// ready-made alternative.
    pub fn with_path_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.path_label = Some(Arc::new(f));
        self
    }

    /// The registry this layer reports into.
    pub fn metrics(&self) -> &MetricsRegistryPtr {
        &self.metrics
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            metrics: Arc::clone(&self.metrics),
            path_label: self.path_label.clone(),
        }
    }
}

/// Records request count, response status and latency around an inner service.
///
/// The request and response pass through untouched. Bookkeeping happens only
/// after the inner future yields a response; if it yields an error, panics,
/// or is dropped first, no series is touched for that request.
#[derive(Clone)]
pub struct MetricsService<S> {
    inner: S,
    metrics: MetricsRegistryPtr,
    path_label: Option<PathLabelFn>,
}

impl<S> MetricsService<S> {
    // ---
    fn path_for<B>(&self, request: &Request<B>) -> String {
        let target = request_target(request);
        match &self.path_label {
            Some(label) => label(target.as_str()),
            None => target,
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        // ---
        let path = self.path_for(&request);
        let timer = self.metrics.start_timer(&path);
        let metrics = Arc::clone(&self.metrics);

        let future = self.inner.call(request);

        Box::pin(async move {
            let response = future.await?;

            let status = CapturedStatus::from_response(&response);
            metrics.inc_status(status.label());
            metrics.inc_request(&path);
            timer.observe();

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::Gatherer;
    use crate::infrastructure::create_prom_metrics;
    use crate::normalize_path;
    use axum::body::Body;
    use axum::http::StatusCode;
    use std::convert::Infallible;
    use std::time::Duration;
    use tower::{service_fn, ServiceBuilder, ServiceExt};

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn default_status_is_counted_as_200() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async { Ok::<_, Infallible>(Response::new(Body::from("hello"))) },
        ));

        let response = service.oneshot(request("/a")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(metrics.status_count("200"), 1);
        assert_eq!(metrics.request_count("/a"), 1);
        assert_eq!(metrics.duration_sample_count("/a"), 1);
    }

    #[tokio::test]
    async fn explicit_status_is_counted_instead_of_200() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async {
                let mut response = Response::new(Body::from("missing"));
                *response.status_mut() = StatusCode::NOT_FOUND;
                Ok::<_, Infallible>(response)
            },
        ));

        service.oneshot(request("/missing")).await.unwrap();

        assert_eq!(metrics.status_count("404"), 1);
        assert_eq!(metrics.status_count("200"), 0);
    }

    #[tokio::test]
    async fn response_passes_through_unchanged() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics).layer(service_fn(|req: Request<Body>| async move {
            let mut response = Response::new(Body::from(req.uri().to_string()));
            response.headers_mut().insert("x-test", "1".parse().unwrap());
            *response.status_mut() = StatusCode::ACCEPTED;
            Ok::<_, Infallible>(response)
        }));

        let response = service.oneshot(request("/echo?q=1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["x-test"], "1");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"/echo?q=1");
    }

    #[tokio::test]
    async fn query_string_is_part_of_the_label() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async { Ok::<_, Infallible>(Response::new(Body::empty())) },
        ));

        service.oneshot(request("/search?q=rust")).await.unwrap();

        assert_eq!(metrics.request_count("/search?q=rust"), 1);
        assert_eq!(metrics.request_count("/search"), 0);
    }

    #[tokio::test]
    async fn path_label_hook_replaces_raw_target() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let layer = MetricsLayer::new(metrics.clone()).with_path_label(normalize_path);
        let service = layer.layer(service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

        service.clone().oneshot(request("/orders/1?x=y")).await.unwrap();
        service.oneshot(request("/orders/2")).await.unwrap();

        assert_eq!(metrics.request_count("/orders/:id"), 2);
        assert_eq!(metrics.duration_sample_count("/orders/:id"), 2);
    }

    #[tokio::test]
    async fn inner_error_skips_every_update() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async { Err::<Response<Body>, _>("boom") },
        ));

        let result = service.oneshot(request("/broken")).await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(metrics.request_count("/broken"), 0);
        assert_eq!(metrics.duration_sample_count("/broken"), 0);
        assert!(metrics.gather().unwrap().is_empty());
    }

    #[tokio::test]
    async fn panicking_handler_records_nothing() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async {
                if true {
                    panic!("handler blew up");
                }
                Ok::<_, Infallible>(Response::new(Body::empty()))
            },
        ));

        let handle = tokio::spawn(service.oneshot(request("/panic")));
        assert!(handle.await.unwrap_err().is_panic());

        assert_eq!(metrics.request_count("/panic"), 0);
        assert_eq!(metrics.duration_sample_count("/panic"), 0);
        assert_eq!(metrics.status_count("200"), 0);
    }

    #[tokio::test]
    async fn cancelled_request_records_nothing() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, Infallible>(Response::new(Body::empty()))
            },
        ));

        let outcome =
            tokio::time::timeout(Duration::from_millis(20), service.oneshot(request("/hang")))
                .await;

        assert!(outcome.is_err());
        assert_eq!(metrics.request_count("/hang"), 0);
        assert_eq!(metrics.duration_sample_count("/hang"), 0);
    }

    #[tokio::test]
    async fn slow_handler_duration_covers_the_sleep() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = MetricsLayer::new(metrics.clone()).layer(service_fn(
            |_req: Request<Body>| async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, Infallible>(Response::new(Body::empty()))
            },
        ));

        service.oneshot(request("/slow")).await.unwrap();

        assert_eq!(metrics.duration_sample_count("/slow"), 1);
        assert!(metrics.duration_sample_sum("/slow") >= 0.050);
    }

    #[tokio::test]
    async fn composes_with_other_layers() {
        // ---
        let metrics = create_prom_metrics("svc").unwrap();
        let service = ServiceBuilder::new()
            .layer(MetricsLayer::new(metrics.clone()))
            .map_response(|mut response: Response<Body>| {
                *response.status_mut() = StatusCode::CREATED;
                response
            })
            .service(service_fn(|_req: Request<Body>| async {
                Ok::<_, Infallible>(Response::new(Body::empty()))
            }));

        service.oneshot(request("/composed")).await.unwrap();

        assert_eq!(metrics.status_count("201"), 1);
        assert_eq!(metrics.request_count("/composed"), 1);
    }
}
