//! Minimal cadena example — one pipeline sealed from a shared chain,
//! served by hyper.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/
//!   curl -i http://localhost:3000/ -H 'authorization: Bearer letmein'
//!   curl -i http://localhost:3000/ \
//!        -H 'authorization: Bearer letmein' \
//!        -H 'x-request-id: abc-123'

use bytes::Bytes;
use cadena::middleware::{RequestId, Trace, X_REQUEST_ID};
use cadena::{BoxedHandler, Chain, Handler, Middleware, Request, Response};
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Chain::new()
        .append(Trace::new())
        .append(RequestId::new())
        .append(bearer_auth("letmein"))
        .then(hello);

    let listener = TcpListener::bind("0.0.0.0:3000").await.expect("bind failed");
    tracing::info!("listening on 0.0.0.0:3000");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _) = match accepted {
                    Ok(v) => v,
                    Err(err) => {
                        tracing::error!("accept error: {err}");
                        continue;
                    }
                };
                tokio::spawn(serve_connection(stream, app.clone()));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    tracing::info!("shutting down");
}

// The terminal handler. By the time it runs, RequestId has already
// stamped the request upstream.
async fn hello(req: Request) -> Response {
    let id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    let body = format!(r#"{{"hello":"world","request_id":"{id}"}}"#);
    Response::new(Full::new(Bytes::from(body)))
}

// Middleware from a plain closure: check the token, short-circuit with
// 401 before the terminal ever runs.
fn bearer_auth(token: &'static str) -> impl Middleware {
    move |next: BoxedHandler| {
        let gate = move |req: Request| {
            let next = next.clone();
            async move {
                let authorized = req
                    .headers()
                    .get(http::header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
                    .is_some_and(|presented| presented == token);

                if authorized {
                    return next.call(req).await;
                }

                let mut res = Response::new(Full::new(Bytes::from_static(b"unauthorized")));
                *res.status_mut() = StatusCode::UNAUTHORIZED;
                res
            }
        };
        gate.into_boxed_handler()
    }
}

// Bridge one TCP connection to the sealed pipeline: buffer the incoming
// body to Bytes, call the handler, let hyper write the response.
async fn serve_connection(stream: TcpStream, app: BoxedHandler) {
    let svc = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
        let app = app.clone();
        async move {
            let (parts, body) = req.into_parts();
            let body = body.collect().await?.to_bytes();
            Ok::<_, hyper::Error>(app.call(Request::from_parts(parts, body)).await)
        }
    });

    if let Err(err) = ConnBuilder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(stream), svc)
        .await
    {
        tracing::warn!(%err, "connection error");
    }
}
