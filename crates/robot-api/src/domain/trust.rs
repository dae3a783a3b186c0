//! Trusted-origin classification of peer addresses.
//!
//! A peer is trusted when it is provably on this host or on the local
//! network: loopback, RFC1918 / unique-local, or link-local. Trusted peers
//! skip the bearer token check.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Literal peer strings accepted before any parsing.
pub const TRUSTED_LITERALS: [&str; 3] = ["127.0.0.1", "::1", "localhost"];

/// Decide whether a peer address may bypass token authentication.
///
/// Total and side-effect free: unparseable input (hostnames other than
/// `localhost`, garbage, empty) is simply untrusted.
pub fn is_trusted(peer_address: &str) -> bool {
    if peer_address.is_empty() {
        return false;
    }

    if TRUSTED_LITERALS.contains(&peer_address) {
        return true;
    }

    match peer_address.parse::<IpAddr>() {
        Ok(ip) => is_trusted_ip(ip),
        Err(_) => false,
    }
}

/// Classification rule for an already parsed address.
pub fn is_trusted_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_trusted_v4(ipv4),
        IpAddr::V6(ipv6) => match ipv6.to_ipv4_mapped() {
            // ::ffff:a.b.c.d from dual-stack sockets
            Some(ipv4) => is_trusted_v4(ipv4),
            None => is_trusted_v6(ipv6),
        },
    }
}

fn is_trusted_v4(ip: Ipv4Addr) -> bool {
    // 127/8, 10/8 + 172.16/12 + 192.168/16, 169.254/16
    ip.is_loopback() || ip.is_private() || ip.is_link_local()
}

fn is_trusted_v6(ip: Ipv6Addr) -> bool {
    ip.is_loopback() || is_unique_local(ip) || is_unicast_link_local(ip)
}

/// fc00::/7
fn is_unique_local(ip: Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

/// fe80::/10
fn is_unicast_link_local(ip: Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}
