// ABOUTME: Derives the requesting client's address for log lines.
// ABOUTME: Prefers the first X-Forwarded-For entry, falls back to the peer address, and strips ports.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Address of the client that sent a request, without any port suffix.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(addr), _) => strip_port(addr),
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Remove a `:port` suffix from `host:port`, `v4:port`, or `[v6]:port`.
/// Bare IPv6 addresses are returned unchanged.
fn strip_port(addr: &str) -> String {
    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return sock.ip().to_string();
    }
    if let Some((host, _)) = addr.strip_prefix('[').and_then(|rest| rest.split_once(']')) {
        return host.to_string();
    }
    match addr.split_once(':') {
        Some((host, port)) if !port.contains(':') => host.to_string(),
        _ => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn uses_peer_address_without_header() {
        let peer: SocketAddr = "192.0.2.10:53211".parse().unwrap();
        assert_eq!(client_address(&HeaderMap::new(), Some(peer)), "192.0.2.10");
    }

    #[test]
    fn strips_port_from_ipv6_peer() {
        let peer: SocketAddr = "[2001:db8::2]:443".parse().unwrap();
        assert_eq!(client_address(&HeaderMap::new(), Some(peer)), "2001:db8::2");
    }

    #[test]
    fn prefers_first_forwarded_entry() {
        let peer: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let headers = forwarded("198.51.100.4, 10.0.0.1, 10.0.0.2");
        assert_eq!(client_address(&headers, Some(peer)), "198.51.100.4");
    }

    #[test]
    fn strips_port_from_forwarded_entry() {
        assert_eq!(client_address(&forwarded("198.51.100.4:8080"), None), "198.51.100.4");
        assert_eq!(client_address(&forwarded("[2001:db8::9]:8080"), None), "2001:db8::9");
        assert_eq!(client_address(&forwarded("proxy.local:3128"), None), "proxy.local");
    }

    #[test]
    fn keeps_bare_ipv6_forwarded_entry() {
        assert_eq!(client_address(&forwarded("2001:db8::9"), None), "2001:db8::9");
        assert_eq!(client_address(&forwarded("::1"), None), "::1");
    }

    #[test]
    fn empty_header_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.10:53211".parse().unwrap();
        assert_eq!(client_address(&forwarded(""), Some(peer)), "192.0.2.10");
    }

    #[test]
    fn unknown_without_any_source() {
        assert_eq!(client_address(&HeaderMap::new(), None), "unknown");
    }
}
