//! Outbound delivery of encoded sentences.

pub mod udp;

use flarmcore::flarm_interface::TrafficSentence;
use std::io;

pub use udp::UdpTransport;

/// Fire-and-forget delivery of one sentence.
pub trait Transport {
    async fn send(&self, sentence: &TrafficSentence) -> io::Result<()>;

    fn describe(&self) -> String;
}
