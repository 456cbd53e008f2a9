//! The ticket triage pipeline.
//!
//! - `state`: the per-ticket record and its merge rules.
//! - `ingest`, `classify`, `lookup`, `draft`: the individual stages.
//! - `graph`: stage routing and the orchestrator that sequences them.

pub mod classify;
pub mod draft;
pub mod graph;
pub mod ingest;
pub mod lookup;
pub mod state;

pub use graph::{Stage, Triage, TriageOutcome};
pub use state::{TriageState, TriageUpdate};
