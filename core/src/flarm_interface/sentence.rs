use serde::Serialize;
use std::fmt;

use crate::prelude::AlarmLevel;

pub const SENTENCE_TAG: &str = "PFLAA";
pub const ID_WIDTH: usize = 6;

const ID_TYPE: u8 = 1;
const AIRCRAFT_TYPE: u8 = 1;

/// Field values of one PFLAA traffic sentence, in wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PflaaFields {
    pub alarm: AlarmLevel,
    pub north: i64,
    pub east: i64,
    pub vertical: i64,
    pub id_hex: String,
    pub track: i64,
    pub ground_speed: String,
    pub climb_rate: String,
}

/// An encoded, checksummed sentence ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficSentence(String);

impl TrafficSentence {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for TrafficSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-width identifier: uppercase hex of the UTF-8 bytes, cut or
/// `F`-padded to six characters.
pub fn to_hex(identifier: &str) -> String {
    let mut hex: String = identifier
        .as_bytes()
        .iter()
        .map(|byte| format!("{:02X}", byte))
        .collect();
    hex.truncate(ID_WIDTH);
    while hex.len() < ID_WIDTH {
        hex.push('F');
    }
    hex
}

/// NMEA XOR checksum over the body, ignoring the `$` and `*` delimiters.
pub fn checksum(body: &str) -> u8 {
    body.trim_matches('$')
        .trim_end_matches('*')
        .bytes()
        .fold(0, |acc, byte| acc ^ byte)
}

/// Appends `*HH\n` to a sentence body.
pub fn encode_sentence(body: &str) -> TrafficSentence {
    TrafficSentence(format!("{}*{:02X}\n", body, checksum(body)))
}

pub fn encode(fields: &PflaaFields) -> TrafficSentence {
    let body = format!(
        "${},{},{},{},{},{},{},{},,{},{},{}",
        SENTENCE_TAG,
        fields.alarm,
        fields.north,
        fields.east,
        fields.vertical,
        ID_TYPE,
        fields.id_hex,
        fields.track,
        fields.ground_speed,
        fields.climb_rate,
        AIRCRAFT_TYPE
    );
    encode_sentence(&body)
}
