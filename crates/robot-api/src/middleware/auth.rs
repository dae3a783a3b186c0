//! Bearer-token gate.
//!
//! Wraps every route. The decision itself lives in [`authorize`]; this layer
//! only pulls the path, the peer address and the `Authorization` header out
//! of the request and turns a rejection into a JSON error response.

use crate::domain::access::{authorize, AccessDecision};
use crate::domain::error::ApiError;
use crate::domain::token::ApiToken;
use axum::{
    body::Body,
    extract::{connect_info::MockConnectInfo, ConnectInfo},
    http::{header::AUTHORIZATION, Request},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    token: Arc<ApiToken>,
}

impl AuthLayer {
    pub fn new(token: Arc<ApiToken>) -> Self {
        Self { token }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            token: Arc::clone(&self.token),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    token: Arc<ApiToken>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let token = Arc::clone(&self.token);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let peer = peer_address(&req);
            let decision = authorize(
                req.uri().path(),
                &peer,
                authorization_header(&req),
                token.as_str(),
            );

            match decision {
                AccessDecision::Allow(reason) => {
                    debug!(path = %req.uri().path(), peer = %peer, reason = ?reason, "Request admitted");
                    inner.call(req).await
                }
                AccessDecision::Reject(reason) => {
                    warn!(
                        method = %req.method(),
                        path = %req.uri().path(),
                        peer = %peer,
                        status = reason.status(),
                        code = reason.code(),
                        "Request rejected"
                    );
                    Ok(ApiError::from(reason).into_response())
                }
            }
        })
    }
}

/// Peer IP as text; empty when no connect info is attached.
///
/// Falls back to `MockConnectInfo` the way axum's `ConnectInfo` extractor
/// does, so routers driven without a socket still see a peer.
pub(crate) fn peer_address<B>(req: &Request<B>) -> String {
    let extensions = req.extensions();
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .or_else(|| {
            extensions
                .get::<MockConnectInfo<SocketAddr>>()
                .map(|MockConnectInfo(addr)| *addr)
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default()
}

/// Raw `Authorization` value; empty when absent or not valid UTF-8.
fn authorization_header<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
