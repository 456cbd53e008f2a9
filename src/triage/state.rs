//! The record threaded through every stage of a single ticket's triage.
//!
//! Stages never mutate a `TriageState` directly.  Each returns a
//! `TriageUpdate` and the orchestrator merges it with [`TriageState::apply`]:
//! - `order_id` is set at most once and never cleared,
//! - `issue_type` and `evidence` travel together as one classification,
//! - `messages` are appended, never replaced.

use serde::{Deserialize, Serialize};

use crate::base::types::{IssueClassification, IssueType, Order, TriageMessage};

/// State of one ticket's triage run.
///
/// Serialized, `issue_type` and `evidence` sit together under
/// `classification`, and the resolved order record under `order`:
///
/// ```json
/// {
///   "ticket_text": "My order ORD1234 arrived broken",
///   "order_id": "ORD1234",
///   "classification": { "issue_type": "damaged_item", "evidence": "arrived broken" },
///   "order": { "order_id": "ORD1234", "status": "delivered" },
///   "recommendation": "Sorry about that; a replacement is on its way.",
///   "messages": [{ "role": "assistant", "content": "..." }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageState {
    ticket_text: String,
    order_id: Option<String>,
    classification: Option<IssueClassification>,
    order: Option<Order>,
    recommendation: Option<String>,
    messages: Vec<TriageMessage>,
}

/// A patch produced by one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriageUpdate {
    pub order_id: Option<String>,
    pub classification: Option<IssueClassification>,
    pub order: Option<Order>,
    pub recommendation: Option<String>,
    pub messages: Vec<TriageMessage>,
}

impl TriageState {
    /// Start a run from raw ticket text.
    pub fn new(ticket_text: impl Into<String>) -> Self {
        Self {
            ticket_text: ticket_text.into(),
            ..Default::default()
        }
    }

    /// Supply an order id up front.  Empty ids are treated as absent.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        let order_id = order_id.into();
        self.order_id = (!order_id.is_empty()).then_some(order_id);
        self
    }

    pub fn ticket_text(&self) -> &str {
        &self.ticket_text
    }

    /// The resolved order id; `None` when absent or empty.
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn classification(&self) -> Option<&IssueClassification> {
        self.classification.as_ref()
    }

    pub fn issue_type(&self) -> Option<IssueType> {
        self.classification.as_ref().map(|c| c.issue_type)
    }

    pub fn evidence(&self) -> Option<&str> {
        self.classification.as_ref().map(|c| c.evidence.as_str())
    }

    /// The order record resolved by the lookup stage.
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn recommendation(&self) -> Option<&str> {
        self.recommendation.as_deref()
    }

    pub fn messages(&self) -> &[TriageMessage] {
        &self.messages
    }

    /// Merge a stage's patch into this state, producing the next state.
    pub fn apply(mut self, update: TriageUpdate) -> Self {
        if self.order_id().is_none() {
            if let Some(order_id) = update.order_id.filter(|id| !id.is_empty()) {
                self.order_id = Some(order_id);
            }
        }

        if let Some(classification) = update.classification {
            self.classification = Some(classification);
        }

        if let Some(order) = update.order {
            self.order = Some(order);
        }

        if let Some(recommendation) = update.recommendation {
            self.recommendation = Some(recommendation);
        }

        self.messages.extend(update.messages);

        self
    }
}
