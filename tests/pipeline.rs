//! End-to-end pipeline tests: a base chain forked per route group,
//! sealed around different terminals, driven through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use cadena::middleware::{RequestId, Trace, X_REQUEST_ID};
use cadena::{BoxedHandler, Chain, Handler, Middleware, Request, Response};
use http::StatusCode;
use http_body_util::{BodyExt, Full};

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

                let mut res = Response::new(Full::new(Bytes::new()));
                *res.status_mut() = StatusCode::UNAUTHORIZED;
                res
            }
        };
        gate.into_boxed_handler()
    }
}

fn counting_terminal(hits: Arc<AtomicUsize>) -> impl Handler {
    move |_req: Request| {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Response::new(Full::new(Bytes::from_static(b"hello")))
        }
    }
}

fn request(auth: Option<&str>) -> Request {
    let mut builder = http::Request::builder().uri("/");
    if let Some(token) = auth {
        builder = builder.header(http::header::AUTHORIZATION, token);
    }
    builder.body(Bytes::new()).unwrap()
}

#[tokio::test]
async fn authorized_request_flows_to_the_terminal() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Chain::new()
        .append(Trace::new())
        .append(RequestId::new())
        .append(bearer_auth("letmein"))
        .then(counting_terminal(hits.clone()));

    let res = app.call(request(Some("Bearer letmein"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(res.headers().contains_key(X_REQUEST_ID));

    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"hello");
}

#[tokio::test]
async fn unauthorized_request_short_circuits_before_the_terminal() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Chain::new()
        .append(Trace::new())
        .append(RequestId::new())
        .append(bearer_auth("letmein"))
        .then(counting_terminal(hits.clone()));

    let res = app.call(request(Some("Bearer wrong"))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    // RequestId sits outside the gate, so even the rejection carries an id.
    assert!(res.headers().contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn a_base_chain_forks_into_route_groups() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = Chain::new().append(Trace::new()).append(RequestId::new());
    let admin = base.append(bearer_auth("letmein"));

    let public = base.then(counting_terminal(hits.clone()));
    let guarded = admin.then(counting_terminal(hits.clone()));

    let res = public.call(request(None)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = guarded.call(request(None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = guarded.call(request(Some("Bearer letmein"))).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
