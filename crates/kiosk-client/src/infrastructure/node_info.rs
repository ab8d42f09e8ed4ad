//! Discovery of the values that identify this workstation to the server.
//!
//! - hostname: from the OS (`hostname` crate).
//! - IPv4 address: the local address the OS would use to reach the
//!   management server.  Found by "connecting" a UDP socket, which only
//!   selects a route and sends nothing.
//! - MAC address: the first non-loopback interface under `/sys/class/net`
//!   (Linux only; empty elsewhere).

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::Path;

use kiosk_core::NodeIdentity;
use tracing::debug;

use crate::application::settings::ClientSettings;

const FALLBACK_NAME: &str = "kiosk";

/// Builds the identity sent with every request.  The node name defaults to
/// the hostname when `node/name` is unset.
pub fn build_identity(settings: &ClientSettings) -> NodeIdentity {
    let hostname = local_hostname();
    let ip_address = local_ipv4(&settings.server.host, settings.server.effective_port())
        .map(|ip| ip.to_string())
        .unwrap_or_default();
    let mac_address = primary_mac().unwrap_or_default();

    let identity = NodeIdentity {
        name: settings
            .node_name
            .clone()
            .unwrap_or_else(|| hostname.clone()),
        location: settings.location.clone(),
        node_type: settings.node_type.clone(),
        age_limit: settings.age_limit.clone(),
        ip_address,
        mac_address,
        hostname,
    };
    debug!(?identity, "node identity");
    identity
}

pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Local IPv4 address of the route towards `host:port`.
pub fn local_ipv4(host: &str, port: u16) -> Option<Ipv4Addr> {
    let target: SocketAddr = (host, port)
        .to_socket_addrs()
        .ok()?
        .find(SocketAddr::is_ipv4)?;
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(target).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// MAC address of the primary interface, upper-case and colon-separated.
pub fn primary_mac() -> Option<String> {
    if cfg!(target_os = "linux") {
        first_mac_in(Path::new("/sys/class/net"))
    } else {
        None
    }
}

/// Scans a `/sys/class/net`-style directory: interfaces in name order,
/// skipping `lo` and all-zero addresses.
fn first_mac_in(net_dir: &Path) -> Option<String> {
    let mut interfaces: Vec<String> = std::fs::read_dir(net_dir)
        .ok()?
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "lo")
        .collect();
    interfaces.sort();

    interfaces.into_iter().find_map(|name| {
        let raw = std::fs::read_to_string(net_dir.join(&name).join("address")).ok()?;
        let mac = raw.trim().to_ascii_uppercase();
        let all_zero = mac.chars().all(|c| c == '0' || c == ':');
        (!mac.is_empty() && !all_zero).then_some(mac)
    })
}

/// Name of the OS account running the client.
pub fn current_os_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}
