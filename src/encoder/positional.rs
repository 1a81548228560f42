//! Fixed-width positional encoding
//!
//! Segments are concatenated with no delimiters; the receiver's fixed-width
//! schema resolves field boundaries. Segment order is part of the wire
//! contract.

use crate::config::EncoderConfig;

use super::{fields, MessageFields};

enum Segment {
    Prefix,
    Text(&'static str),
    Number(&'static str),
    Trailer,
}

/// Production byte order: originator (Conta Cedente) precedes receiver (Conta Cessionária)
const LAYOUT: [Segment; 7] = [
    Segment::Prefix,
    Segment::Text(fields::ORIGINATOR_ACCOUNT),
    Segment::Text(fields::RECEIVER_ACCOUNT),
    Segment::Text(fields::ISSUER),
    Segment::Number(fields::UNIT_PRICE),
    Segment::Number(fields::FINANCIAL_AMOUNT),
    Segment::Trailer,
];

pub fn encode(config: &EncoderConfig, message: &MessageFields) -> String {
    LAYOUT
        .iter()
        .map(|segment| match segment {
            Segment::Prefix => config.positional_prefix.clone(),
            Segment::Text(name) => message.text(name),
            Segment::Number(name) => message.number_text(name),
            Segment::Trailer => config.positional_trailer.clone(),
        })
        .collect()
}
