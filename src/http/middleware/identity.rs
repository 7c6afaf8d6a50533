//! Identity resolution middleware.
//! Attaches the caller's identity and client descriptor to the request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::security::{ClientDescriptor, IdentityResolver};

/// State required for identity resolution.
#[derive(Clone)]
pub struct IdentityState {
    pub resolver: Arc<IdentityResolver>,
    pub client_header: Arc<str>,
}

fn client_descriptor(request: &Request<Body>, client_header: &str) -> ClientDescriptor {
    let name = request
        .headers()
        .get(client_header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ClientDescriptor::UNKNOWN)
        .to_string();
    let address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    ClientDescriptor { name, address }
}

pub async fn identity_middleware(
    State(state): State<IdentityState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_descriptor(&request, &state.client_header);

    let identity = match state.resolver.resolve(request.headers()).await {
        Ok(identity) => identity,
        Err(rejection) => {
            tracing::info!(
                client = %client.name,
                peer = ?client.address,
                "Request rejected: no valid credential"
            );
            return rejection.into_response();
        }
    };

    tracing::debug!(
        origin = %identity.origin,
        user = %identity.display_name,
        client = %client.name,
        peer = ?client.address,
        "Request authenticated"
    );

    request.extensions_mut().insert(identity);
    request.extensions_mut().insert(client);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_descriptor_defaults() {
        let request = Request::new(Body::empty());
        let client = client_descriptor(&request, "x-luminakraft-client");
        assert_eq!(client.name, "unknown");
        assert_eq!(client.address, None);
    }

    #[test]
    fn test_client_descriptor_reads_header_and_peer() {
        let mut request = Request::builder()
            .header("x-luminakraft-client", "launcher/1.4.2")
            .body(Body::empty())
            .unwrap();
        let peer: SocketAddr = "192.168.1.20:40000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        let client = client_descriptor(&request, "x-luminakraft-client");
        assert_eq!(client.name, "launcher/1.4.2");
        assert_eq!(client.address, Some(peer));
    }
}
