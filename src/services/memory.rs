//! In-memory collaborators for tests and dry runs

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::Scenario;

use super::ports::{MessageTransport, ScenarioStore, StoredScenario, StoredStep};

#[derive(Debug, Default)]
struct StoreState {
    next_scenario_id: i64,
    next_step_id: i64,
    scenarios: Vec<StoredScenario>,
}

/// Sequential-id scenario store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryScenarioStore {
    state: Mutex<StoreState>,
}

impl InMemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScenarioStore for InMemoryScenarioStore {
    async fn save(&self, scenario: &Scenario) -> anyhow::Result<StoredScenario> {
        let mut state = self.state.lock().await;

        state.next_scenario_id += 1;
        let id = state.next_scenario_id;

        let mut steps = Vec::with_capacity(scenario.steps.len());
        for (idx, step) in scenario.steps.iter().enumerate() {
            state.next_step_id += 1;
            steps.push(StoredStep {
                id: state.next_step_id,
                ordering: idx + 1,
                step: step.clone(),
            });
        }

        let mut recorded = scenario.clone();
        recorded.id = Some(id);
        let stored = StoredScenario {
            id,
            scenario: recorded,
            steps,
        };
        state.scenarios.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> anyhow::Result<Vec<StoredScenario>> {
        // Ids are handed out in push order, so storage order is id order
        Ok(self.state.lock().await.scenarios.clone())
    }
}

/// Transport that records every delivery
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(queue, payload)` pairs in delivery order
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageTransport for InMemoryTransport {
    async fn send(&self, queue: &str, payload: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .await
            .push((queue.to_string(), payload.to_string()));
        Ok(())
    }
}
