//! Axum extractors for request metadata
//!
//! - [`RecordId`]: path identity, rejected before any store call when malformed
//! - [`ClientAddr`]: the caller's network address, derived from the transport

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRef, FromRequestParts, Path};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::core::error::AdminError;

/// Prefix the transport adds to IPv4 peers on dual-stack sockets
const IPV4_MAPPED_PREFIX: &str = "::ffff:";

/// Address stored when the peer cannot be determined
pub const UNKNOWN_ADDR: &str = "unknown";

/// Record identity taken from the `{id}` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Uuid);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AdminError::InvalidIdentifier {
                value: e.body_text(),
            })?;

        parse_record_id(&raw).map(RecordId)
    }
}

/// Parse a path identity
pub fn parse_record_id(raw: &str) -> Result<Uuid, AdminError> {
    Uuid::parse_str(raw).map_err(|_| AdminError::InvalidIdentifier {
        value: raw.to_string(),
    })
}

/// Whether forwarding headers set by a reverse proxy are believed
///
/// Off by default: without a trusted proxy in front, these headers are
/// client-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardedHeaders(pub bool);

/// Caller's network address, normalized to plain IPv4 when mapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
    ForwardedHeaders: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ForwardedHeaders(trust) = ForwardedHeaders::from_ref(state);
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let forwarded = if trust {
            forwarded_addr(&parts.headers)
        } else {
            None
        };

        let raw = forwarded
            .or(peer)
            .unwrap_or_else(|| UNKNOWN_ADDR.to_string());
        Ok(ClientAddr(normalize_client_addr(&raw)))
    }
}

/// First address named by `X-Forwarded-For`, else `X-Real-IP`
fn forwarded_addr(headers: &HeaderMap) -> Option<String> {
    let first_forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    first_forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

/// Strip the IPv4-mapped IPv6 prefix, leaving other addresses unchanged
pub fn normalize_client_addr(addr: &str) -> String {
    addr.strip_prefix(IPV4_MAPPED_PREFIX)
        .unwrap_or(addr)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[derive(Clone)]
    struct TestState(bool);

    impl FromRef<TestState> for ForwardedHeaders {
        fn from_ref(state: &TestState) -> Self {
            ForwardedHeaders(state.0)
        }
    }

    async fn extract(req: Request<()>, trust: bool) -> String {
        let (mut parts, _) = req.into_parts();
        let ClientAddr(addr) = ClientAddr::from_request_parts(&mut parts, &TestState(trust))
            .await
            .unwrap();
        addr
    }

    #[test]
    fn test_mapped_prefix_is_stripped() {
        assert_eq!(normalize_client_addr("::ffff:192.0.2.5"), "192.0.2.5");
    }

    #[test]
    fn test_plain_addresses_unchanged() {
        assert_eq!(normalize_client_addr("192.0.2.5"), "192.0.2.5");
        assert_eq!(normalize_client_addr("2001:db8::1"), "2001:db8::1");
    }

    #[test]
    fn test_parse_record_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_record_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_record_id("count"),
            Err(AdminError::InvalidIdentifier { .. })
        ));
    }

    #[tokio::test]
    async fn test_mapped_peer_address_is_normalized() {
        let mapped = Ipv4Addr::new(192, 0, 2, 5).to_ipv6_mapped();
        let mut req = Request::builder().body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((Ipv6Addr::from(mapped), 4000))));
        assert_eq!(extract(req, false).await, "192.0.2.5");
    }

    #[tokio::test]
    async fn test_forwarded_headers_ignored_unless_trusted() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));
        assert_eq!(extract(req, false).await, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_trusted_forwarded_header_uses_first_hop() {
        let req = Request::builder()
            .header("x-forwarded-for", "::ffff:203.0.113.9, 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(extract(req, true).await, "203.0.113.9");
    }

    #[tokio::test]
    async fn test_missing_peer_is_unknown() {
        let req = Request::builder().body(()).unwrap();
        assert_eq!(extract(req, true).await, UNKNOWN_ADDR);
    }
}
