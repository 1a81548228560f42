//! Message Dispatcher
//!
//! Wraps each step of a scenario in an [`OutboundMessage`] and delivers the
//! JSON envelope to the transport, in step order.

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{OutboundMessage, Scenario};

use super::ports::MessageTransport;

pub struct MessageDispatcher {
    transport: Arc<dyn MessageTransport>,
    queue: String,
}

impl MessageDispatcher {
    pub fn new(transport: Arc<dyn MessageTransport>, queue: impl Into<String>) -> Self {
        Self {
            transport,
            queue: queue.into(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Deliver one envelope per step; stops at the first transport failure
    pub async fn dispatch(&self, scenario: &Scenario) -> anyhow::Result<Vec<OutboundMessage>> {
        if scenario.steps.is_empty() {
            bail!("Scenario '{}' has no test steps", scenario.description);
        }

        let mut delivered = Vec::with_capacity(scenario.steps.len());
        for step in &scenario.steps {
            let message = OutboundMessage::from_step(step);
            let payload = serde_json::to_string(&message)
                .context("Failed to serialize outbound message")?;

            self.transport
                .send(&self.queue, &payload)
                .await
                .with_context(|| format!("Failed to deliver message to queue {}", self.queue))?;

            debug!(
                correlation_id = %message.correlation_id,
                channel = %message.channel,
                "Message delivered"
            );
            delivered.push(message);
        }

        info!(
            scenario = %scenario.description,
            messages = delivered.len(),
            queue = %self.queue,
            "Scenario dispatched"
        );
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, EncodedPayload, MessageStatus, StepFields};
    use crate::services::memory::InMemoryTransport;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    fn step(code: &str, payload: EncodedPayload) -> crate::models::Step {
        let channel = match payload {
            EncodedPayload::Positional(_) => Channel::classify("IOS", "IOS"),
            EncodedPayload::Xml(_) => Channel::classify("MQ", "IOS"),
        };
        StepFields {
            description: format!("passo {code}"),
            step_type: "Envio".to_string(),
            channel,
            operation_code: code.to_string(),
            originator_account: String::new(),
            receiver_account: String::new(),
            operation_number: String::new(),
            issuer: String::new(),
            financial_amount: Decimal::ZERO,
            unit_price: Decimal::ZERO,
        }
        .into_step(payload)
    }

    #[tokio::test]
    async fn delivers_one_envelope_per_step_in_order() {
        let transport = Arc::new(InMemoryTransport::new());
        let dispatcher = MessageDispatcher::new(transport.clone(), "queue.RECEIVE_QUEUE");

        let mut scenario = Scenario::new("Cenário A", "Regressão");
        scenario.steps.push(step("1052", EncodedPayload::Xml("<DOC/>".into())));
        scenario.steps.push(step("1054", EncodedPayload::Positional("SSEIN".into())));

        let delivered = dispatcher.dispatch(&scenario).await.unwrap();
        assert_eq!(delivered.len(), 2);
        assert!(delivered.iter().all(|m| m.status == MessageStatus::Sending));

        let sent = transport.sent().await;
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|(queue, _)| queue == "queue.RECEIVE_QUEUE"));

        let first: serde_json::Value = serde_json::from_str(&sent[0].1).unwrap();
        assert_eq!(first["messageCode"], "1052");
        assert_eq!(first["xml"], "<DOC/>");
        let second: serde_json::Value = serde_json::from_str(&sent[1].1).unwrap();
        assert_eq!(second["positional"], "SSEIN");
        assert_eq!(second["channel"], "IOS");
    }

    #[tokio::test]
    async fn empty_scenario_is_rejected() {
        let transport = Arc::new(InMemoryTransport::new());
        let dispatcher = MessageDispatcher::new(transport.clone(), "q");

        let err = dispatcher
            .dispatch(&Scenario::new("vazio", "T"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no test steps"));
        assert!(transport.sent().await.is_empty());
    }

    struct FailingTransport;

    #[async_trait]
    impl MessageTransport for FailingTransport {
        async fn send(&self, _queue: &str, _payload: &str) -> anyhow::Result<()> {
            bail!("connection closed")
        }
    }

    #[tokio::test]
    async fn transport_failure_is_propagated_with_queue_context() {
        let dispatcher = MessageDispatcher::new(Arc::new(FailingTransport), "queue.X");
        let mut scenario = Scenario::new("A", "T");
        scenario.steps.push(step("1052", EncodedPayload::Xml("<DOC/>".into())));

        let err = dispatcher.dispatch(&scenario).await.unwrap_err();
        assert!(err.to_string().contains("queue.X"));
        assert!(format!("{err:#}").contains("connection closed"));
    }
}
