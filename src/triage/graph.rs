//! The triage state machine.
//!
//! ```text
//! Ingest ─┬─ order id ──► Classify ──► FetchOrder ──► DraftReply ──► End
//!         └─ no order id ───────────────────────────────────────────► End
//! ```
//!
//! Stages run strictly one after another.  Each returns a patch which the
//! orchestrator merges into the state and checkpoints before moving on.  The
//! first failing stage ends the run; nothing is retried.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    base::prompts,
    prelude::*,
    service::{
        checkpoint::{Checkpoint, CheckpointStore},
        llm::LlmClient,
        orders::OrderRepository,
    },
};

use super::{
    classify::classify_issue,
    draft::draft_reply,
    ingest::ingest,
    lookup::fetch_order,
    state::{TriageState, TriageUpdate},
};

// Stages.

/// The stages of a triage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Classify,
    FetchOrder,
    DraftReply,
    /// Terminal.
    End,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::End)
    }

    /// The stage that follows this one, given the state it produced.
    pub fn next(self, state: &TriageState) -> Stage {
        match self {
            Stage::Ingest => route_after_ingest(state),
            Stage::Classify => Stage::FetchOrder,
            Stage::FetchOrder => Stage::DraftReply,
            Stage::DraftReply => Stage::End,
            Stage::End => Stage::End,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "ingest"),
            Stage::Classify => write!(f, "classify_issue"),
            Stage::FetchOrder => write!(f, "fetch_order"),
            Stage::DraftReply => write!(f, "draft_reply"),
            Stage::End => write!(f, "end"),
        }
    }
}

/// The pipeline's only branch: classify when an order id is known, else stop.
pub fn route_after_ingest(state: &TriageState) -> Stage {
    match state.order_id() {
        Some(_) => Stage::Classify,
        None => Stage::End,
    }
}

// Outcomes.

/// How a triage run ended.
#[derive(Debug)]
pub enum TriageOutcome {
    /// Every stage ran; the state carries a recommendation.
    Drafted(TriageState),
    /// No order id could be resolved, so the run stopped after ingestion.
    Unidentified(TriageState),
    /// A stage failed; `state` is as it stood before that stage.
    Failed { stage: Stage, state: TriageState, error: TriageError },
}

impl TriageOutcome {
    /// Outcome of a run that reached `End`, given the last stage it completed.
    ///
    /// Only a completed `DraftReply` counts as drafted; a `recommendation`
    /// carried in by the caller says nothing about how this run ended.
    fn finished(last: Option<Stage>, state: TriageState) -> Self {
        match last {
            Some(Stage::DraftReply) => TriageOutcome::Drafted(state),
            _ => TriageOutcome::Unidentified(state),
        }
    }

    pub fn state(&self) -> &TriageState {
        match self {
            TriageOutcome::Drafted(state) | TriageOutcome::Unidentified(state) => state,
            TriageOutcome::Failed { state, .. } => state,
        }
    }

    pub fn into_state(self) -> TriageState {
        match self {
            TriageOutcome::Drafted(state) | TriageOutcome::Unidentified(state) => state,
            TriageOutcome::Failed { state, .. } => state,
        }
    }

    pub fn error(&self) -> Option<&TriageError> {
        match self {
            TriageOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_drafted(&self) -> bool {
        matches!(self, TriageOutcome::Drafted(_))
    }
}

// Orchestrator.

/// The triage orchestrator.
///
/// Built with explicit handles to its collaborators; cheap to clone, so
/// independent tickets can be triaged on separate tasks.
#[derive(Clone)]
pub struct Triage {
    llm: LlmClient,
    orders: OrderRepository,
    checkpoints: Option<CheckpointStore>,
    classifier_directive: String,
    drafter_directive: String,
}

impl Triage {
    pub fn new(llm: LlmClient, orders: OrderRepository) -> Self {
        Self {
            llm,
            orders,
            checkpoints: None,
            classifier_directive: prompts::CLASSIFIER_DIRECTIVE.to_string(),
            drafter_directive: prompts::DRAFTER_DIRECTIVE.to_string(),
        }
    }

    /// Persist a checkpoint after every stage.
    pub fn with_checkpoints(mut self, checkpoints: CheckpointStore) -> Self {
        self.checkpoints = Some(checkpoints);
        self
    }

    /// Override the classifier and drafter directives.
    pub fn with_directives(mut self, classifier_directive: impl Into<String>, drafter_directive: impl Into<String>) -> Self {
        self.classifier_directive = classifier_directive.into();
        self.drafter_directive = drafter_directive.into();
        self
    }

    /// Triage one ticket from the start.
    ///
    /// Stage failures are reported through [`TriageOutcome::Failed`]; an `Err`
    /// means the checkpoint store itself failed.
    #[instrument(name = "Triage::run", skip(self, state))]
    pub async fn run(&self, thread_id: &str, state: TriageState) -> Res<TriageOutcome> {
        self.checkpoint(thread_id, 0, None, Stage::Ingest, &state).await?;

        self.drive(thread_id, 0, None, Stage::Ingest, state).await
    }

    /// Continue a run from its latest checkpoint.
    ///
    /// A finished run returns its final outcome without executing any stage.
    #[instrument(name = "Triage::resume", skip(self))]
    pub async fn resume(&self, thread_id: &str) -> Res<TriageOutcome> {
        let checkpoints = self.checkpoints.as_ref().ok_or_else(|| anyhow!("Checkpointing is not enabled."))?;
        let checkpoint = checkpoints.load(thread_id).await?.ok_or_else(|| anyhow!("No checkpoint for thread `{thread_id}`."))?;

        info!("Resuming at step {} (`{}`).", checkpoint.step, checkpoint.next);

        self.drive(thread_id, checkpoint.step, checkpoint.last, checkpoint.next, checkpoint.state).await
    }

    async fn drive(&self, thread_id: &str, mut step: u32, mut last: Option<Stage>, mut stage: Stage, mut state: TriageState) -> Res<TriageOutcome> {
        while !stage.is_terminal() {
            match self.execute(stage, &state).await {
                Ok(update) => {
                    state = state.apply(update);
                    step += 1;

                    let next = stage.next(&state);
                    info!("Stage `{stage}` complete; next: `{next}`.");

                    last = Some(stage);
                    self.checkpoint(thread_id, step, last, next, &state).await?;
                    stage = next;
                }
                Err(error) => {
                    warn!("Stage `{stage}` failed: {error}");
                    return Ok(TriageOutcome::Failed { stage, state, error });
                }
            }
        }

        Ok(TriageOutcome::finished(last, state))
    }

    async fn execute(&self, stage: Stage, state: &TriageState) -> Result<TriageUpdate, TriageError> {
        match stage {
            Stage::Ingest => Ok(ingest(state)),
            Stage::Classify => classify_issue(&self.llm, &self.classifier_directive, state).await,
            Stage::FetchOrder => fetch_order(&self.orders, state),
            Stage::DraftReply => draft_reply(&self.llm, &self.drafter_directive, state).await,
            Stage::End => Ok(TriageUpdate::default()),
        }
    }

    async fn checkpoint(&self, thread_id: &str, step: u32, last: Option<Stage>, next: Stage, state: &TriageState) -> Void {
        let Some(checkpoints) = &self.checkpoints else {
            return Ok(());
        };

        let checkpoint = Checkpoint {
            thread_id: thread_id.to_string(),
            step,
            last,
            next,
            state: state.clone(),
            saved_at: Utc::now(),
        };

        checkpoints.save(&checkpoint).await
    }
}
