//! UDP wake-on-LAN sender.
//!
//! One magic packet is one datagram.  Broadcast is enabled on the socket so
//! that the server may direct packets at a subnet broadcast address.  Sends
//! are fire-and-forget: [`UdpWakeSender::send`] hands the datagram to a
//! spawned task and returns at once, so a slow name lookup never holds up
//! the caller.  Failures inside the task are logged and dropped.

use std::net::SocketAddr;

use kiosk_core::MagicPacket;
use tokio::net::{lookup_host, UdpSocket};
use tokio::runtime::Handle;
use tracing::debug;

use crate::application::ports::{WakeError, WakeOnLanSender};

#[derive(Debug, Default, Clone, Copy)]
pub struct UdpWakeSender;

impl UdpWakeSender {
    pub fn new() -> Self {
        Self
    }
}

impl WakeOnLanSender for UdpWakeSender {
    fn send(&self, packet: &MagicPacket, host: &str, port: u16) -> Result<(), WakeError> {
        let runtime = Handle::try_current().map_err(|_| WakeError::NoRuntime)?;
        let datagram = packet.as_bytes().to_vec();
        let host = host.to_string();
        runtime.spawn(async move {
            if let Err(e) = send_datagram(&datagram, &host, port).await {
                debug!(%host, port, "magic packet not delivered: {e}");
            }
        });
        Ok(())
    }
}

/// Resolves `host` and sends `datagram` to it from a broadcast-enabled
/// socket.
async fn send_datagram(datagram: &[u8], host: &str, port: u16) -> Result<SocketAddr, WakeError> {
    let unresolved = || WakeError::Unresolved {
        host: host.to_string(),
        port,
    };
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|_| unresolved())?
        .collect();
    // Prefer IPv4 for broadcast targets.
    let target = addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(unresolved)?;

    let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.set_broadcast(true)?;
    let sent = socket.send_to(datagram, target).await?;
    debug!(%target, sent, "wake-on-LAN datagram sent");
    Ok(target)
}
