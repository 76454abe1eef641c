//! Client identity used as the quota key.
//!
//! The first entry of `X-Forwarded-For` wins (the gateway normally sits
//! behind a proxy), then the connection's peer address, then `"unknown"`.
//! The forwarded header is trusted as-is.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Opaque client key extracted from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        if let Some(first) = forwarded {
            return Self(first.to_string());
        }

        match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => Self(addr.ip().to_string()),
            None => Self(UNKNOWN_CLIENT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(forwarded: Option<&str>, peer: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/command");
        if let Some(value) = forwarded {
            builder = builder.header("X-Forwarded-For", value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            parts.extensions.insert(ConnectInfo(addr));
        }
        parts
    }

    #[test]
    fn first_forwarded_entry_wins() {
        let parts = parts(Some(" 203.0.113.7 , 10.0.0.1, 10.0.0.2"), Some("127.0.0.1:5000"));
        assert_eq!(ClientIdentity::from_parts(&parts).as_str(), "203.0.113.7");
    }

    #[test]
    fn peer_address_without_port() {
        let parts = parts(None, Some("192.168.1.20:53211"));
        assert_eq!(ClientIdentity::from_parts(&parts).as_str(), "192.168.1.20");
    }

    #[test]
    fn blank_forwarded_falls_back_to_peer() {
        let parts = parts(Some("  , 10.0.0.1"), Some("[::1]:8080"));
        assert_eq!(ClientIdentity::from_parts(&parts).as_str(), "::1");
    }

    #[test]
    fn nothing_known() {
        let parts = parts(None, None);
        assert_eq!(ClientIdentity::from_parts(&parts).to_string(), "unknown");
    }
}
