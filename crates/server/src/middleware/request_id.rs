//! # Request ID Middleware
//!
//! Tags every request with a [`RequestId`], runs it inside a span carrying that ID and
//! echoes it back in the `x-request-id` response header. The span itself is stored as a
//! [`RequestSpan`] extension so inner layers can record onto it.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use logging::{RequestId, REQUEST_ID_HEADER};
use tracing::{field::display, Instrument as _, Span};
use uuid::Uuid;

/// The span a request runs in
#[derive(Debug, Clone)]
pub struct RequestSpan(pub Span);

impl RequestSpan {
    /// Record the authenticated user on the request span.
    pub fn record_user(&self, user_id: Uuid) {
        self.0.record("user_id", display(user_id));
    }
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestId::from_header)
        .unwrap_or_default();

    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        user_id = tracing::field::Empty,
    );
    request.extensions_mut().insert(RequestSpan(span.clone()));

    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use axum::{body::Body, http::Request, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.to_string() }),
            )
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(!header.is_empty());
    }

    #[tokio::test]
    async fn test_echoes_caller_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "client-trace-0001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "client-trace-0001"
        );
    }

    #[tokio::test]
    async fn test_user_recorded_on_request_span() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let user_id = Uuid::new_v4();
        let app = Router::new()
            .route(
                "/",
                get(|| {
                    async {
                        tracing::info!("handled");
                    }
                }),
            )
            .layer(middleware::from_fn(move |request: Request<Body>, next: Next| {
                async move {
                    if let Some(span) = request.extensions().get::<RequestSpan>() {
                        span.record_user(user_id);
                    }
                    next.run(request).await
                }
            }))
            .layer(middleware::from_fn(request_id_middleware));

        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line = output.lines().find(|line| line.contains("handled")).unwrap();
        assert!(line.contains("request{"));
        assert!(line.contains(&format!("user_id={user_id}")));
    }
}
