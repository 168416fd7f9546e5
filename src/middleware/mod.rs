//! Middleware contract and built-in middleware.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection,
//! authentication-header inspection.
//!
//! A middleware is a transform over handlers. [`Middleware::wrap`] receives
//! the handler standing for "the rest of the pipeline" and returns the
//! handler that takes its place: work before invoking `next`, work after it,
//! or no invocation at all. Skipping `next` ends the pipeline for that
//! request — deliberate short-circuiting (an auth rejection, say), not an
//! error.
//!
//! Built-in middleware:
//! - [`Trace`] — per-request span with method, path, status, latency
//! - [`RequestId`] — correlation-id injection and propagation
//!
//! # Writing middleware
//!
//! A plain closure from handler to handler is already middleware:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use cadena::{BoxedHandler, Handler, Request};
//! use http_body_util::Full;
//!
//! let reject_anonymous = |next: BoxedHandler| {
//!     (move |req: Request| {
//!         let next = Arc::clone(&next);
//!         async move {
//!             if req.headers().contains_key("authorization") {
//!                 next.call(req).await
//!             } else {
//!                 http::Response::builder()
//!                     .status(http::StatusCode::UNAUTHORIZED)
//!                     .body(Full::new(Bytes::new()))
//!                     .expect("static response")
//!             }
//!         }
//!     })
//!     .into_boxed_handler()
//! };
//! # let _: cadena::BoxedMiddleware = Arc::new(reject_anonymous);
//! ```
//!
//! Middleware that carries configuration implements [`Middleware`] on a
//! struct instead — [`Trace`] and [`RequestId`] are the in-tree examples.

mod request_id;
mod trace;

pub use request_id::{RequestId, X_REQUEST_ID};
pub use trace::Trace;

use std::sync::Arc;

use crate::handler::BoxedHandler;

/// A transform from handler to handler.
///
/// Implementations hold no request state: `wrap` runs once per chain
/// sealing, and the handler it returns runs once per request. Anything the
/// returned handler needs from the middleware is cloned into it at wrap
/// time.
pub trait Middleware: Send + Sync + 'static {
    /// Wraps `next` and returns the handler that stands in its place.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// Lambda-backed middleware: any `Fn(BoxedHandler) -> BoxedHandler`.
impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// A heap-allocated, type-erased middleware, as stored by a chain.
pub type BoxedMiddleware = Arc<dyn Middleware>;
