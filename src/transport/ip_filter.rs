//! Peer address blocklist middleware.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::{
    collections::HashSet,
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Layer that rejects requests from blocked peer addresses with `403`.
///
/// The peer address comes from axum's [`ConnectInfo<SocketAddr>`], so the
/// router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`. Requests without
/// connection info are let through.
///
/// # Example
///
/// ```rust,ignore
/// use recent_tokens::transport::IpFilterLayer;
///
/// let router = Router::new()
///     .route("/api/hash", get(handler))
///     .layer(IpFilterLayer::new(["10.0.0.1".parse().unwrap()]));
/// ```
#[derive(Clone, Debug)]
pub struct IpFilterLayer {
    blocked: Arc<HashSet<IpAddr>>,
}

impl IpFilterLayer {
    pub fn new(blocked: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            blocked: Arc::new(blocked.into_iter().map(|ip| ip.to_canonical()).collect()),
        }
    }
}

impl<S> Layer<S> for IpFilterLayer {
    type Service = IpFilterService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IpFilterService {
            inner,
            blocked: self.blocked.clone(),
        }
    }
}

/// Service produced by [`IpFilterLayer`].
#[derive(Clone, Debug)]
pub struct IpFilterService<S> {
    inner: S,
    blocked: Arc<HashSet<IpAddr>>,
}

impl<S> Service<Request<Body>> for IpFilterService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_canonical());

        if let Some(ip) = peer.filter(|ip| self.blocked.contains(ip)) {
            tracing::info!(%ip, "rejected blocked peer");
            let response = (StatusCode::FORBIDDEN, "Forbidden").into_response();
            return Box::pin(async move { Ok::<_, S::Error>(response) });
        }

        // Take the service that was driven to readiness, leave a fresh clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
