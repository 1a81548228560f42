//! Message Encoder
//!
//! Projects a step's field values into the channel-specific wire payload.
//! The channel value alone selects the policy:
//!
//! - the positional channel (`IOS` by default) gets a fixed-width,
//!   delimiter-free string ([`positional`])
//! - every other channel gets a namespaced XML document ([`xml`])
//!
//! Field sets differ per operation code and are not modelled as fixed
//! records, so the body is carried as an ordered [`MessageFields`] list of
//! (name, value) pairs and serialized generically.

pub mod positional;
pub mod xml;

use rust_decimal::Decimal;
use std::fmt;

use crate::config::EncoderConfig;
use crate::error::EncodingError;
use crate::models::{EncodedPayload, StepFields};

/// Wire names of the body fields supplied by ingestion
pub mod fields {
    pub const ISSUER: &str = "Emi";
    pub const OPERATION_NUMBER: &str = "NUOp";
    pub const ORIGINATOR_ACCOUNT: &str = "ctCed";
    pub const RECEIVER_ACCOUNT: &str = "ctCes";
    pub const FINANCIAL_AMOUNT: &str = "VlrFinanc";
    pub const UNIT_PRICE: &str = "Pu";
}

/// A single body value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            // Natural representation: no trailing zeros, no fixed precision
            FieldValue::Number(d) => write!(f, "{}", d.normalize()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Number(value)
    }
}

/// Ordered named field list
///
/// Insertion order is preserved; pushing an existing name replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFields {
    entries: Vec<(String, FieldValue)>,
}

impl MessageFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.push(name, FieldValue::Text(value.into()));
    }

    pub fn push_number(&mut self, name: impl Into<String>, value: Decimal) {
        self.push(name, FieldValue::Number(value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Rendered value of a field, or the empty string when absent
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(ToString::to_string).unwrap_or_default()
    }

    /// Rendered value of a numeric field, or `0` when absent
    pub fn number_text(&self, name: &str) -> String {
        self.get(name)
            .map(ToString::to_string)
            .unwrap_or_else(|| FieldValue::Number(Decimal::ZERO).to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for MessageFields
where
    N: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = MessageFields::new();
        for (name, value) in iter {
            fields.push(name, value);
        }
        fields
    }
}

/// Encodes step values into wire payloads
#[derive(Debug, Clone, Default)]
pub struct MessageEncoder {
    config: EncoderConfig,
}

impl MessageEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn is_positional(&self, channel: &str) -> bool {
        channel == self.config.positional_channel
    }

    /// Encode a field list for the given channel and operation code
    ///
    /// Fails only when the XML document cannot be structurally built.
    pub fn encode(
        &self,
        channel: &str,
        operation_code: &str,
        fields: &MessageFields,
    ) -> Result<EncodedPayload, EncodingError> {
        if self.is_positional(channel) {
            Ok(EncodedPayload::Positional(positional::encode(
                &self.config,
                fields,
            )))
        } else {
            xml::encode_document(&self.config, operation_code, fields).map(EncodedPayload::Xml)
        }
    }

    pub fn encode_step(&self, step: &StepFields) -> Result<EncodedPayload, EncodingError> {
        let fields = step.clone().into_message_fields();
        self.encode(step.channel.as_str(), &step.operation_code, &fields)
    }
}
