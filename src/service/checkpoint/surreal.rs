//! SurrealDB implementation of the checkpoint store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{
    RecordId, Surreal,
    engine::local::{Db, Mem},
};
use tracing::{debug, info, instrument};

use crate::{
    base::types::{Res, Void},
    triage::graph::Stage,
};

use super::{Checkpoint, CheckpointStore, GenericCheckpointStore};

const CHECKPOINT_TABLE: &str = "checkpoint";

// Extra methods on `CheckpointStore` applied by the surreal implementation.

impl CheckpointStore {
    /// Creates a checkpoint store backed by an in-memory SurrealDB instance.
    pub async fn surreal_memory() -> Res<Self> {
        let store = SurrealCheckpointStore::memory().await?;
        Ok(Self { inner: Arc::new(store) })
    }
}

/// A checkpoint row.  The state is kept as serialized JSON.
#[derive(Debug, Serialize, Deserialize)]
struct SurrealCheckpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    thread_id: String,
    step: u32,
    last: Option<Stage>,
    next: Stage,
    state: String,
    saved_at: DateTime<Utc>,
}

impl SurrealCheckpoint {
    fn from_checkpoint(checkpoint: &Checkpoint) -> Res<Self> {
        Ok(Self {
            id: None,
            thread_id: checkpoint.thread_id.clone(),
            step: checkpoint.step,
            last: checkpoint.last,
            next: checkpoint.next,
            state: serde_json::to_string(&checkpoint.state)?,
            saved_at: checkpoint.saved_at,
        })
    }

    fn into_checkpoint(self) -> Res<Checkpoint> {
        Ok(Checkpoint {
            thread_id: self.thread_id,
            step: self.step,
            last: self.last,
            next: self.next,
            state: serde_json::from_str(&self.state)?,
            saved_at: self.saved_at,
        })
    }
}

/// SurrealDB checkpoint store.
#[derive(Clone)]
pub struct SurrealCheckpointStore {
    db: Surreal<Db>,
}

impl SurrealCheckpointStore {
    /// Create an in-memory store.
    #[instrument(name = "SurrealCheckpointStore::memory", skip_all)]
    pub async fn memory() -> Res<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns("triage").use_db("tickets").await?;

        info!("Checkpoint store initialized.");

        Ok(Self { db })
    }
}

#[async_trait]
impl GenericCheckpointStore for SurrealCheckpointStore {
    #[instrument(name = "SurrealCheckpointStore::save", skip_all, fields(thread_id = %checkpoint.thread_id, step = checkpoint.step))]
    async fn save(&self, checkpoint: &Checkpoint) -> Void {
        let record = SurrealCheckpoint::from_checkpoint(checkpoint)?;

        let _: Option<SurrealCheckpoint> = self.db.upsert((CHECKPOINT_TABLE, checkpoint.thread_id.as_str())).content(record).await?;
        debug!("Checkpoint saved; next stage: {}.", checkpoint.next);

        Ok(())
    }

    #[instrument(name = "SurrealCheckpointStore::load", skip(self))]
    async fn load(&self, thread_id: &str) -> Res<Option<Checkpoint>> {
        let record: Option<SurrealCheckpoint> = self.db.select((CHECKPOINT_TABLE, thread_id)).await?;

        record.map(SurrealCheckpoint::into_checkpoint).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::state::TriageState;

    fn checkpoint(thread_id: &str, step: u32, next: Stage) -> Checkpoint {
        Checkpoint {
            thread_id: thread_id.to_string(),
            step,
            last: None,
            next,
            state: TriageState::new("My order ORD1234 arrived broken").with_order_id("ORD1234"),
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_thread() {
        let store = CheckpointStore::surreal_memory().await.unwrap();

        assert!(store.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_latest() {
        let store = CheckpointStore::surreal_memory().await.unwrap();

        store.save(&checkpoint("thread-1", 1, Stage::Classify)).await.unwrap();
        store.save(&checkpoint("thread-1", 2, Stage::FetchOrder)).await.unwrap();
        store.save(&checkpoint("thread-2", 1, Stage::End)).await.unwrap();

        let loaded = store.load("thread-1").await.unwrap().unwrap();
        assert_eq!(loaded.step, 2);
        assert_eq!(loaded.next, Stage::FetchOrder);
        assert_eq!(loaded.state.order_id(), Some("ORD1234"));

        let other = store.load("thread-2").await.unwrap().unwrap();
        assert_eq!(other.next, Stage::End);
    }
}
