//! Outbound message envelope handed to the transport collaborator

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::scenario::Step;

/// Brazil has had no daylight saving since 2019; São Paulo is fixed at UTC-3
const BRAZIL_OFFSET_SECS: i32 = -3 * 3600;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Delivery status of an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageStatus {
    #[serde(rename = "ENVIANDO")]
    Sending,
    #[serde(rename = "ENVIADO")]
    Sent,
    #[serde(rename = "PROCESSADO")]
    Processed,
    #[serde(rename = "NÃO PROCESSADO")]
    NotProcessed,
}

/// One step's payload wrapped for queue delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub correlation_id: Uuid,
    pub message_code: String,
    pub channel: String,
    /// XML document, empty for positional steps
    pub xml: String,
    /// Positional string, empty for XML steps
    pub positional: String,
    pub status: MessageStatus,
    #[serde(serialize_with = "serialize_local_timestamp")]
    pub created_at: DateTime<FixedOffset>,
}

impl OutboundMessage {
    /// Wrap a step's payload with a fresh correlation id and timestamp
    pub fn from_step(step: &Step) -> Self {
        Self::with_identity(step, Uuid::new_v4(), now_in_brazil())
    }

    pub fn with_identity(
        step: &Step,
        correlation_id: Uuid,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            correlation_id,
            message_code: step.operation_code.clone(),
            channel: step.channel.as_str().to_string(),
            xml: step.payload.xml().unwrap_or_default().to_string(),
            positional: step.payload.positional().unwrap_or_default().to_string(),
            status: MessageStatus::Sending,
            created_at,
        }
    }
}

pub fn now_in_brazil() -> DateTime<FixedOffset> {
    // Offset is a compile-time constant well inside the valid range
    match FixedOffset::east_opt(BRAZIL_OFFSET_SECS) {
        Some(offset) => Utc::now().with_timezone(&offset),
        None => Utc::now().fixed_offset(),
    }
}

fn serialize_local_timestamp<S: Serializer>(
    value: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, EncodedPayload, StepFields};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn positional_step() -> Step {
        StepFields {
            description: "Lançamento".to_string(),
            step_type: "Envio".to_string(),
            channel: Channel::classify("IOS", "IOS"),
            operation_code: "1052".to_string(),
            originator_account: "111".to_string(),
            receiver_account: "222".to_string(),
            operation_number: "7".to_string(),
            issuer: "BANCO".to_string(),
            financial_amount: Decimal::ZERO,
            unit_price: Decimal::ZERO,
        }
        .into_step(EncodedPayload::Positional("SSEIN111222".to_string()))
    }

    #[test]
    fn envelope_carries_payload_in_the_matching_slot() {
        let message = OutboundMessage::from_step(&positional_step());
        assert_eq!(message.positional, "SSEIN111222");
        assert!(message.xml.is_empty());
        assert_eq!(message.status, MessageStatus::Sending);
        assert_eq!(message.message_code, "1052");
        assert_eq!(message.created_at.offset().local_minus_utc(), BRAZIL_OFFSET_SECS);
    }

    #[test]
    fn envelope_serializes_with_production_status_and_timestamp() {
        let offset = FixedOffset::east_opt(BRAZIL_OFFSET_SECS).unwrap();
        let created_at = offset.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let message =
            OutboundMessage::with_identity(&positional_step(), Uuid::nil(), created_at);

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["status"], "ENVIANDO");
        assert_eq!(json["createdAt"], "2024-03-09T14:05:07");
        assert_eq!(json["messageCode"], "1052");
        assert_eq!(json["channel"], "IOS");
        assert_eq!(json["correlationId"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn not_processed_status_keeps_accent() {
        let json = serde_json::to_string(&MessageStatus::NotProcessed).unwrap();
        assert_eq!(json, "\"NÃO PROCESSADO\"");
    }
}
