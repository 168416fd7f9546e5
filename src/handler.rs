//! Handler contract and type erasure.
//!
//! # What a handler is here
//!
//! A handler is any `async fn(Request) -> Response`. The chain does not own
//! the request/response vocabulary — the hosting runtime does — so both are
//! plain [`http`] types with the body pinned to owned bytes: a buffered
//! request in, a buffered response out.
//!
//! # How async handlers are stored
//!
//! A middleware receives "the rest of the pipeline" as a value, and chains
//! hold handlers of *different* concrete types behind a single interface, so
//! we use **trait objects** (`dyn ErasedHandler`) to hide the concrete
//! handler type and pass everything around uniformly.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ chain.then(hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)  at request time               ← one vtable dispatch
//! ```
//!
//! The only runtime cost per invocation is **one Arc clone** (atomic inc) +
//! **one virtual call** per layer — negligible compared to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;

// ── Invocation vocabulary ─────────────────────────────────────────────────────

/// An incoming request with a fully buffered body.
///
/// Streaming bodies would force the chain to take a position on transport
/// concerns it stays out of; the runtime buffers at the edge (one
/// `collect().to_bytes()` on hyper's `Incoming`) and the proxy in front owns
/// the size limit.
pub type Request = http::Request<Bytes>;

/// An outgoing response with a complete body.
pub type Response = http::Response<Full<Bytes>>;

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place — it cannot move it in memory after the first poll.
/// `Send + 'static` let multi-threaded runtimes move the future across
/// threads safely.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

// ── Erased dispatch interface ─────────────────────────────────────────────────

/// The uniform dispatch interface of every stored handler.
///
/// This is the form a middleware sees: the `next` handler it wraps is a
/// [`BoxedHandler`], and running the rest of the pipeline is one
/// `next.call(req)` away. Most code never implements this trait — closures
/// go through [`Handler`] instead — but it is public because middleware
/// invoke through it.
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent invocations.
///
/// `Arc` gives cheap, thread-safe shared ownership (one atomic reference
/// count increment per use) without copying the handler.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every value a chain can seal into a pipeline.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` or closure with the signature:
///
/// ```text
/// async fn name(req: Request) -> Response
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it. This prevents accidental misuse and
/// keeps the API surface stable across versions.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    /// Converts into the stored form.
    ///
    /// Middleware implementations call this on the closure they built around
    /// `next` to return it as their wrapped handler.
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

/// Implement the sealing trait for any function with the right signature.
///
/// `Fn(Request) -> Fut` covers:
///   - named `async fn` items
///   - closures returning an `async move` block
///   - any struct that implements `Fn`
impl<F, Fut> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
}

/// Implement `Handler` for any function with the right signature.
impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // Call the wrapped function — this returns the concrete `Fut`.
        // Boxing it erases the type so the return matches the trait signature.
        Box::pin((self.0)(req))
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    fn request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Bytes::new())
            .expect("test request")
    }

    async fn hello(_req: Request) -> Response {
        http::Response::new(Full::new(Bytes::from_static(b"hello")))
    }

    #[tokio::test]
    async fn named_async_fn_is_a_handler() {
        let handler = hello.into_boxed_handler();

        let res = handler.call(request("/")).await;

        assert_eq!(res.status(), http::StatusCode::OK);
        let body = res.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(body, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn closure_is_a_handler() {
        let handler = (|req: Request| async move {
            let body = format!("path={}", req.uri().path());
            http::Response::new(Full::new(Bytes::from(body)))
        })
        .into_boxed_handler();

        let res = handler.call(request("/users/7")).await;

        let body = res.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(body, Bytes::from_static(b"path=/users/7"));
    }

    #[tokio::test]
    async fn boxed_handler_is_reusable_and_shareable() {
        let handler = hello.into_boxed_handler();
        let clone = Arc::clone(&handler);

        let first = handler.call(request("/")).await;
        let second = clone.call(request("/")).await;

        assert_eq!(first.status(), second.status());
    }
}
