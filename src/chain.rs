//! Ordered, immutable middleware chains.
//!
//! A [`Chain`] holds middleware in the order they should apply and seals
//! them around a terminal handler with [`Chain::then`]. Chains are values:
//! every extension operation returns a new chain backed by a fresh sequence
//! and leaves the receiver untouched, so a shared base chain can be forked
//! per route group without the groups disturbing each other.

use std::sync::Arc;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{BoxedMiddleware, Middleware};

/// An immutable, ordered sequence of middleware.
///
/// Middleware apply in declaration order: the first middleware appended is
/// the outermost wrapper — first to see a request, last to see the response.
/// An empty chain is valid and seals as pure pass-through.
///
/// Cloning copies the sequence of `Arc` pointers into a fresh backing
/// vector; the middleware themselves are shared.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use cadena::middleware::{RequestId, Trace};
/// use cadena::{Chain, Request, Response};
/// use http_body_util::Full;
///
/// async fn hello(_req: Request) -> Response {
///     http::Response::new(Full::new(Bytes::from_static(b"hello")))
/// }
///
/// let chain = Chain::new().append(Trace::new()).append(RequestId::new());
/// let app = chain.then(hello); // BoxedHandler — hand it to your runtime
/// ```
#[derive(Clone)]
pub struct Chain {
    middleware: Vec<BoxedMiddleware>,
}

impl Chain {
    /// Creates an empty chain.
    ///
    /// Populate it with chained [`append`](Chain::append) calls:
    ///
    /// ```rust
    /// use cadena::Chain;
    /// use cadena::middleware::{RequestId, Trace};
    ///
    /// let chain = Chain::new().append(Trace::new()).append(RequestId::new());
    /// ```
    pub fn new() -> Self {
        Self { middleware: Vec::new() }
    }

    /// Returns a new chain with `middleware` appended at the end.
    ///
    /// The receiver is left unchanged and remains independently usable — the
    /// new chain is backed by its own freshly allocated sequence, never an
    /// aliased one, so no later operation on either chain can disturb the
    /// other.
    ///
    /// No validation of the middleware happens here; whatever it does, it
    /// does when the sealed handler is invoked.
    pub fn append(&self, middleware: impl Middleware) -> Self {
        let mut extended: Vec<BoxedMiddleware> =
            Vec::with_capacity(self.middleware.len() + 1);
        extended.extend(self.middleware.iter().cloned());
        extended.push(Arc::new(middleware));
        Self { middleware: extended }
    }

    /// Returns a new chain holding the receiver's middleware followed by
    /// `other`'s, in `other`'s declared order.
    ///
    /// Equivalent to appending `other`'s middleware one by one. Both
    /// operands are left intact.
    ///
    /// ```rust
    /// use cadena::Chain;
    /// use cadena::middleware::{RequestId, Trace};
    ///
    /// let base = Chain::new().append(Trace::new());
    /// let extras = Chain::new().append(RequestId::new());
    /// let combined = base.extend(&extras); // Trace, then RequestId
    /// ```
    pub fn extend(&self, other: &Chain) -> Self {
        let mut extended: Vec<BoxedMiddleware> =
            Vec::with_capacity(self.middleware.len() + other.middleware.len());
        extended.extend(self.middleware.iter().cloned());
        extended.extend(other.middleware.iter().cloned());
        Self { middleware: extended }
    }

    /// Seals the chain around `terminal` and returns the composed handler.
    ///
    /// Each middleware wraps everything declared after it, so for a chain of
    /// `[m1, m2, m3]` the result is `m1(m2(m3(terminal)))`: `m1` is the
    /// first to see a request and the last to see the response.
    ///
    /// This is pure composition — nothing is invoked until the runtime calls
    /// the returned handler, and nothing here can fail. Whatever a
    /// middleware or the terminal handler does at invocation time (errors,
    /// panics, honoring a deadline) passes through exactly as that unit
    /// defines it; the chain adds nothing in the path.
    ///
    /// The chain is borrowed, not consumed: one chain may seal any number of
    /// pipelines around different terminals.
    pub fn then(&self, terminal: impl Handler) -> BoxedHandler {
        let mut sealed = terminal.into_boxed_handler();
        for middleware in self.middleware.iter().rev() {
            sealed = middleware.wrap(sealed);
        }
        sealed
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
