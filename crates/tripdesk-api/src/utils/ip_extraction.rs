//! Client IP resolution for audit entries
//!
//! The back office runs behind a configurable number of trusted proxies. Each
//! proxy appends the address it received the request from to
//! `X-Forwarded-For`, so the client is the entry just before the trusted tail.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const UNKNOWN: &str = "unknown";

/// Best-effort client address: `X-Forwarded-For`, then `X-Real-IP`, then the
/// socket peer. Returns `"unknown"` when none of them holds a valid address.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("x-forwarded-for")
        .and_then(|chain| forwarded_client(chain, trusted_proxy_count))
        .or_else(|| header("x-real-ip").and_then(|v| v.trim().parse::<IpAddr>().ok()))
        .or_else(|| socket_addr.map(SocketAddr::ip))
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Pick the client from a forwarded chain.
///
/// With no trusted proxies, or a chain no longer than the trusted tail, only
/// the hop closest to us can be believed.
fn forwarded_client(chain: &str, trusted_proxy_count: usize) -> Option<IpAddr> {
    let hops: Vec<&str> = chain
        .split(',')
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    let position = if trusted_proxy_count == 0 || hops.len() <= trusted_proxy_count {
        hops.len().checked_sub(1)?
    } else {
        hops.len() - trusted_proxy_count - 1
    };

    hops.get(position)?.parse().ok()
}
