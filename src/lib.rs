//! # cadena
//!
//! Composable middleware chains for async HTTP handlers.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Your server owns the sockets; cadena owns the composition. A
//! [`Chain`] is an ordered, immutable list of middleware, and sealing it
//! around a terminal handler with [`Chain::then`] folds the list into a
//! single [`BoxedHandler`] — first appended, outermost wrapped. What you
//! mount that handler on is your business.
//!
//! What the runtime already owns — cadena intentionally ignores:
//!
//! - **Routing** — pick a router, seal one pipeline per route
//! - **Concurrency** — sealed handlers are `Send + Sync`; spawn freely
//! - **Connection failures, timeouts, cancellation** — the server's job
//!
//! What's left for cadena — the only part that changes between pipelines:
//!
//! - Ordered composition — [`Chain::append`], [`Chain::extend`]
//! - Value semantics — every operation returns a fresh chain, receivers
//!   are never touched, so a shared base forks into per-route variants
//! - Sealing — [`Chain::then`] produces a plain callable handler
//!
//! ## Quick start
//!
//! ```rust
//! use bytes::Bytes;
//! use cadena::middleware::{RequestId, Trace};
//! use cadena::{Chain, Request, Response};
//! use http_body_util::Full;
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::new(Full::new(Bytes::from_static(b"hello")))
//! }
//!
//! let base = Chain::new().append(Trace::new()).append(RequestId::new());
//!
//! // `app` is a plain boxed handler: call it yourself or hand it to a
//! // server loop. `base` is untouched and still forks into more routes.
//! let app = base.then(hello);
//! # let _ = app;
//! ```
//!
//! ## Writing middleware
//!
//! Anything that wraps a handler in another handler is middleware: a
//! closure taking and returning a [`BoxedHandler`], or a struct
//! implementing [`Middleware`] when it carries configuration. See the
//! [`middleware`] module for both shapes and the built-in layers.

mod chain;
mod handler;

pub mod middleware;

pub use chain::Chain;
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, Request, Response};
pub use middleware::{BoxedMiddleware, Middleware};
