//! Library root for `ticket-triage`.
//!
//! Ticket-triage takes the free text of a customer support ticket and:
//! - Extracts the order id it refers to
//! - Classifies the issue into a fixed set of categories
//! - Looks up the referenced order
//! - Drafts a short reply for the customer
//!
//! The pipeline is a small state machine (see [`triage::graph`]).  Its
//! collaborators (language model, order repository, checkpoint store) sit
//! behind traits and are injected explicitly, so they can be swapped or mocked.

pub mod base;
pub mod prelude;
pub mod runtime;
pub mod service;
pub mod triage;

use base::{config::Config, types::Res};
use tracing::info;
use triage::{TriageOutcome, TriageState};

/// Public async entry for the binary crate.
///
/// Sets up the runtime from config and triages a single ticket.
pub async fn start(config: Config, thread_id: &str, state: TriageState) -> Res<TriageOutcome> {
    info!("Starting ticket-triage ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Triage the ticket.
    runtime.run(thread_id, state).await
}
