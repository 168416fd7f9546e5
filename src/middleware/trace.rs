//! Per-request tracing spans.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::handler::{BoxedHandler, Handler, Request};
use crate::middleware::Middleware;

/// Middleware that runs every invocation inside a `tracing` span.
///
/// The span is named `request` and carries the method and path; when the
/// inner pipeline finishes, a completion event records the response status
/// and the elapsed milliseconds. Requests and responses pass through
/// unmodified.
///
/// Declare it first so the span covers everything declared after it:
///
/// ```rust
/// use cadena::Chain;
/// use cadena::middleware::Trace;
///
/// let chain = Chain::new().append(Trace::new());
/// ```
///
/// Events emitted by later middleware and the terminal handler land inside
/// the span, so one `RUST_LOG=info` line per request comes with its method
/// and path attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Trace {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for Trace {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (move |req: Request| {
            let next = Arc::clone(&next);
            let span = info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
            );
            async move {
                let started = Instant::now();
                let response = next.call(req).await;
                info!(
                    status = response.status().as_u16(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request served"
                );
                response
            }
            .instrument(span)
        })
        .into_boxed_handler()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};

    use super::*;

    #[tokio::test]
    async fn passes_request_and_response_through() {
        let handler = Trace::new().wrap(
            (|req: Request| async move {
                http::Response::builder()
                    .status(http::StatusCode::CREATED)
                    .body(Full::new(Bytes::from(req.uri().path().to_owned())))
                    .expect("test response")
            })
            .into_boxed_handler(),
        );

        let req = http::Request::builder()
            .uri("/traced")
            .body(Bytes::new())
            .expect("test request");
        let res = handler.call(req).await;

        assert_eq!(res.status(), http::StatusCode::CREATED);
        let body = res.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(body, Bytes::from_static(b"/traced"));
    }
}
