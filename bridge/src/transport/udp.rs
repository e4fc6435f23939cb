use flarmcore::flarm_interface::TrafficSentence;
use std::io;
use std::net::SocketAddr;
use tokio::net::{lookup_host, UdpSocket};

use super::Transport;

/// Sends one datagram per sentence to a fixed destination.
pub struct UdpTransport {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpTransport {
    /// Resolves `host:port` once and binds an ephemeral local socket of the
    /// matching address family.
    pub async fn connect(host: &str, port: u16) -> io::Result<Self> {
        let destination = lookup_host((host, port)).await?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address for {}:{}", host, port),
            )
        })?;

        let local = if destination.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local).await?;

        Ok(Self {
            socket,
            destination,
        })
    }

    #[cfg(test)]
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

impl Transport for UdpTransport {
    async fn send(&self, sentence: &TrafficSentence) -> io::Result<()> {
        self.socket
            .send_to(sentence.as_bytes(), self.destination)
            .await
            .map(|_| ())
    }

    fn describe(&self) -> String {
        format!("udp {}", self.destination)
    }
}
