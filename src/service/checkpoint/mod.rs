//! Checkpointing of triage state between stages.
//!
//! The orchestrator saves a [`Checkpoint`] under the run's thread id after every
//! stage, so a run can be inspected afterwards or resumed from the stage that
//! failed.

pub mod surreal;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    base::types::{Res, Void},
    triage::{graph::Stage, state::TriageState},
};

// Types.

/// A snapshot of a run, taken after a stage completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The run / thread identifier.
    pub thread_id: String,
    /// Number of stages completed so far.
    pub step: u32,
    /// The stage that just completed; `None` before the first stage.
    pub last: Option<Stage>,
    /// The stage to execute next.
    pub next: Stage,
    /// The state after the last completed stage.
    pub state: TriageState,
    pub saved_at: DateTime<Utc>,
}

// Traits.

/// Generic checkpoint store trait that stores must implement.
#[async_trait]
pub trait GenericCheckpointStore: Send + Sync + 'static {
    /// Save a checkpoint, replacing any previous one for the same thread.
    async fn save(&self, checkpoint: &Checkpoint) -> Void;

    /// Load the latest checkpoint for a thread, if any.
    async fn load(&self, thread_id: &str) -> Res<Option<Checkpoint>>;
}

// Structs.

/// Checkpoint store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct CheckpointStore {
    inner: Arc<dyn GenericCheckpointStore>,
}

impl Deref for CheckpointStore {
    type Target = dyn GenericCheckpointStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl CheckpointStore {
    pub fn new(inner: Arc<dyn GenericCheckpointStore>) -> Self {
        Self { inner }
    }
}
