//! Collaborator ports
//!
//! Persistence and transport consume finished scenarios and envelopes; they
//! never influence how those are built.

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{Scenario, Step};

/// A scenario as recorded by a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredScenario {
    pub id: i64,
    /// Copy of the ingested scenario with `id` filled in
    pub scenario: Scenario,
    pub steps: Vec<StoredStep>,
}

/// A step and its position within its scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredStep {
    pub id: i64,
    /// 1-based execution order
    pub ordering: usize,
    pub step: Step,
}

/// Scenario persistence
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Record a scenario and its steps, assigning ids and ordering
    async fn save(&self, scenario: &Scenario) -> anyhow::Result<StoredScenario>;

    /// All stored scenarios ordered by id, steps in execution order
    async fn list(&self) -> anyhow::Result<Vec<StoredScenario>>;
}

/// Queue delivery of serialized envelopes
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, queue: &str, payload: &str) -> anyhow::Result<()>;
}
