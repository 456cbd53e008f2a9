//! Runtime services and shared state for ticket-triage.

use tracing::instrument;

use crate::{
    base::{config::Config, types::Res},
    service::{checkpoint::CheckpointStore, llm::LlmClient, orders::OrderRepository},
    triage::{Triage, TriageOutcome, TriageState},
};

/// Runtime service context.
///
/// Holds the configuration and every collaborator the pipeline needs.  It is
/// trivially cloneable, allowing it to be passed around without `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The order repository, loaded once.
    pub orders: OrderRepository,
    /// The checkpoint store.
    pub checkpoints: CheckpointStore,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Load the order dataset.
        let orders = OrderRepository::json(&config.orders_path)?;

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the checkpoint store.
        let checkpoints = CheckpointStore::surreal_memory().await?;

        Ok(Self { config, llm, orders, checkpoints })
    }

    /// Build the orchestrator from this runtime's collaborators.
    pub fn triage(&self) -> Triage {
        Triage::new(self.llm.clone(), self.orders.clone())
            .with_checkpoints(self.checkpoints.clone())
            .with_directives(self.config.classifier_directive.clone(), self.config.drafter_directive.clone())
    }

    /// Triage a single ticket.
    pub async fn run(&self, thread_id: &str, state: TriageState) -> Res<TriageOutcome> {
        self.triage().run(thread_id, state).await
    }
}
