//! Collaborators consumed by the triage pipeline.
//!
//! - Language models (e.g., OpenAI) for classification and drafting.
//! - The order repository (e.g., a JSON dataset).
//! - Checkpoint storage (e.g., SurrealDB).
//!
//! Each service module defines both a generic trait and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod checkpoint;
pub mod llm;
pub mod orders;
