//! Correlation-id injection and propagation.

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use uuid::Uuid;

use crate::handler::{BoxedHandler, Handler, Request};
use crate::middleware::Middleware;

/// Default header consulted and stamped by [`RequestId`].
pub const X_REQUEST_ID: &str = "x-request-id";

/// Middleware that gives every invocation a correlation id.
///
/// A non-empty id already on the request is kept, so ids minted by a
/// fronting proxy survive; otherwise a UUID v4 is generated. The id is
/// written onto the request — everything declared after this middleware,
/// terminal handler included, sees it — and echoed onto the response for
/// the client.
///
/// Declare it early (right after [`Trace`](crate::middleware::Trace)) so
/// even short-circuited rejections carry an id.
///
/// ```rust
/// use cadena::Chain;
/// use cadena::middleware::RequestId;
///
/// let chain = Chain::new().append(RequestId::new());
/// ```
#[derive(Clone, Debug)]
pub struct RequestId {
    header: HeaderName,
}

impl RequestId {
    /// Uses the default [`X_REQUEST_ID`] header.
    pub fn new() -> Self {
        Self { header: HeaderName::from_static(X_REQUEST_ID) }
    }

    /// Uses a custom header name instead.
    ///
    /// ```rust
    /// use cadena::middleware::RequestId;
    /// use http::header::HeaderName;
    ///
    /// let mw = RequestId::with_header(HeaderName::from_static("x-correlation-id"));
    /// ```
    pub fn with_header(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for RequestId {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        let header = self.header.clone();
        (move |mut req: Request| {
            let next = Arc::clone(&next);
            let header = header.clone();
            async move {
                let id = match req.headers().get(&header) {
                    Some(id) if !id.is_empty() => id.clone(),
                    _ => fresh_id(),
                };
                req.headers_mut().insert(header.clone(), id.clone());

                let mut response = next.call(req).await;
                response.headers_mut().insert(header, id);
                response
            }
        })
        .into_boxed_handler()
    }
}

/// A new UUID v4 as a header value. The hyphenated lowercase form is always
/// a valid header value.
fn fresh_id() -> HeaderValue {
    let mut buf = Uuid::encode_buffer();
    let id = Uuid::new_v4().hyphenated().encode_lower(&mut buf);
    HeaderValue::from_str(id).expect("uuid text is a valid header value")
}
