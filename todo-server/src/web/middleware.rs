use axum::http::{HeaderName, HeaderValue, Method, Request, Response};
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

const PROCESS_TIME_HEADER: &str = "x-process-time-ms";

/// Layer that records how long each request took. Only installed when the
/// server runs with `DEBUG=true`.
#[derive(Clone, Default)]
pub struct DiagnosticsLayer;

impl DiagnosticsLayer {
    /// Creates a new DiagnosticsLayer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for DiagnosticsLayer {
    type Service = DiagnosticsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DiagnosticsService { inner }
    }
}

/// Service that times the inner service and reports the latency.
#[derive(Clone)]
pub struct DiagnosticsService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DiagnosticsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = DiagnosticsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        DiagnosticsFuture {
            future: self.inner.call(request),
            started: Instant::now(),
            method,
            path,
        }
    }
}

pin_project! {
    /// Future that resolves to the inner response with timing information added
    pub struct DiagnosticsFuture<F> {
        #[pin]
        future: F,
        started: Instant,
        method: Method,
        path: String,
    }
}

impl<F, ResBody, E> Future for DiagnosticsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.future.poll(cx) {
            Poll::Ready(Ok(mut response)) => {
                let elapsed = this.started.elapsed();
                let elapsed_ms = format!("{:.3}", elapsed.as_secs_f64() * 1000.0);
                tracing::debug!(
                    method = %this.method,
                    path = %this.path,
                    status = response.status().as_u16(),
                    elapsed_ms = %elapsed_ms,
                    "request diagnostics"
                );
                if let Ok(value) = HeaderValue::from_str(&elapsed_ms) {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(PROCESS_TIME_HEADER), value);
                }
                Poll::Ready(Ok(response))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::{Router, response::Response};
    use tower::ServiceExt;

    #[tokio::test]
    async fn can_add_process_time_header() {
        let app = Router::new()
            .route("/test", axum::routing::get(|| async { "test response" }))
            .layer(DiagnosticsLayer::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let elapsed = response
            .headers()
            .get(PROCESS_TIME_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<f64>().ok());
        assert!(elapsed.is_some_and(|ms| ms >= 0.0));
    }

    #[tokio::test]
    async fn can_preserve_existing_headers_and_status() {
        async fn handler_with_custom_header() -> Response<String> {
            let mut response = Response::new("missing".to_string());
            *response.status_mut() = StatusCode::NOT_FOUND;
            response.headers_mut().insert(
                "custom-header",
                axum::http::HeaderValue::from_static("custom-value"),
            );
            response
        }

        let app = Router::new()
            .route(
                "/test-with-headers",
                axum::routing::get(handler_with_custom_header),
            )
            .layer(DiagnosticsLayer::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/test-with-headers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let headers = response.headers();
        assert!(headers.get(PROCESS_TIME_HEADER).is_some());
        assert_eq!(
            headers.get("custom-header"),
            Some(&axum::http::HeaderValue::from_static("custom-value"))
        );
    }
}
