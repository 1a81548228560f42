//! Scenario and step value objects
//!
//! Built once per ingestion call by the block parser and handed to the
//! caller; persistence assigns identifiers separately.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::encoder::{fields, MessageFields};

/// A named group of ordered test steps (one end-to-end business flow)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    /// Assigned on persistence, always `None` at parse time
    pub id: Option<i64>,
    pub description: String,
    pub scenario_type: String,
    /// Source row order; drives downstream execution order
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(description: impl Into<String>, scenario_type: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
            scenario_type: scenario_type.into(),
            steps: Vec::new(),
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// One message-level action within a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub description: String,
    pub step_type: String,
    pub channel: Channel,
    pub operation_code: String,
    pub originator_account: String,
    pub receiver_account: String,
    pub operation_number: String,
    pub issuer: String,
    pub financial_amount: Decimal,
    pub unit_price: Decimal,
    pub payload: EncodedPayload,
}

impl Step {
    /// The named field list the encoder projects into a wire payload
    pub fn message_fields(&self) -> MessageFields {
        StepFields::from(self).into_message_fields()
    }
}

/// Step values before encoding
///
/// The parser fills this from a data row, encodes it, then seals it into a
/// [`Step`] together with the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFields {
    pub description: String,
    pub step_type: String,
    pub channel: Channel,
    pub operation_code: String,
    pub originator_account: String,
    pub receiver_account: String,
    pub operation_number: String,
    pub issuer: String,
    pub financial_amount: Decimal,
    pub unit_price: Decimal,
}

impl StepFields {
    pub fn into_message_fields(self) -> MessageFields {
        let mut message = MessageFields::new();
        message.push_text(fields::ISSUER, self.issuer);
        message.push_text(fields::OPERATION_NUMBER, self.operation_number);
        message.push_text(fields::ORIGINATOR_ACCOUNT, self.originator_account);
        message.push_text(fields::RECEIVER_ACCOUNT, self.receiver_account);
        message.push_number(fields::FINANCIAL_AMOUNT, self.financial_amount);
        message.push_number(fields::UNIT_PRICE, self.unit_price);
        message
    }

    pub fn into_step(self, payload: EncodedPayload) -> Step {
        Step {
            description: self.description,
            step_type: self.step_type,
            channel: self.channel,
            operation_code: self.operation_code,
            originator_account: self.originator_account,
            receiver_account: self.receiver_account,
            operation_number: self.operation_number,
            issuer: self.issuer,
            financial_amount: self.financial_amount,
            unit_price: self.unit_price,
            payload,
        }
    }
}

impl From<&Step> for StepFields {
    fn from(step: &Step) -> Self {
        Self {
            description: step.description.clone(),
            step_type: step.step_type.clone(),
            channel: step.channel.clone(),
            operation_code: step.operation_code.clone(),
            originator_account: step.originator_account.clone(),
            receiver_account: step.receiver_account.clone(),
            operation_number: step.operation_number.clone(),
            issuer: step.issuer.clone(),
            financial_amount: step.financial_amount,
            unit_price: step.unit_price,
        }
    }
}

// ============================================================================
// CHANNEL
// ============================================================================

/// Transport/format class of a step's message
///
/// Both variants keep the literal cell text so the value round-trips
/// unchanged to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Fixed-width, delimiter-free string (the "IOS" channel)
    Positional(String),
    /// Queue-delivered XML document
    Queue(String),
}

impl Channel {
    /// Classify a channel cell against the configured positional literal
    pub fn classify(value: &str, positional_literal: &str) -> Self {
        if value == positional_literal {
            Channel::Positional(value.to_string())
        } else {
            Channel::Queue(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Channel::Positional(s) | Channel::Queue(s) => s,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Channel::Positional(_))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// ENCODED PAYLOAD
// ============================================================================

/// Channel-specific wire payload of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum EncodedPayload {
    Positional(String),
    Xml(String),
}

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        match self {
            EncodedPayload::Positional(s) | EncodedPayload::Xml(s) => s,
        }
    }

    pub fn xml(&self) -> Option<&str> {
        match self {
            EncodedPayload::Xml(s) => Some(s),
            EncodedPayload::Positional(_) => None,
        }
    }

    pub fn positional(&self) -> Option<&str> {
        match self {
            EncodedPayload::Positional(s) => Some(s),
            EncodedPayload::Xml(_) => None,
        }
    }
}
