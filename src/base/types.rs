//! Common types shared across the pipeline and its collaborators.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Issue classification.

/// The closed set of categories a ticket can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    RefundRequest,
    LateDelivery,
    MissingItem,
    DamagedItem,
    WrongItem,
    Unknown,
}

impl IssueType {
    /// Every category, in prompt order.
    pub const ALL: [IssueType; 6] = [
        IssueType::RefundRequest,
        IssueType::LateDelivery,
        IssueType::MissingItem,
        IssueType::DamagedItem,
        IssueType::WrongItem,
        IssueType::Unknown,
    ];

    /// The wire name of the category (e.g. `damaged_item`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::RefundRequest => "refund_request",
            IssueType::LateDelivery => "late_delivery",
            IssueType::MissingItem => "missing_item",
            IssueType::DamagedItem => "damaged_item",
            IssueType::WrongItem => "wrong_item",
            IssueType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = Err;

    fn from_str(s: &str) -> Res<Self> {
        IssueType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown issue type: `{s}`."))
    }
}

/// Structured classification returned by the language model.
///
/// Both fields are required; a response missing either one fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueClassification {
    pub issue_type: IssueType,
    pub evidence: String,
}

// Orders.

/// An order record from the order repository.
///
/// Only `order_id` is interpreted; everything else is carried through as-is
/// into the drafting prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Errors raised by an order repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("order `{order_id}` not found")]
    NotFound { order_id: String },
}

// Trace messages.

/// Who produced a trace message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Assistant,
    Tool,
}

/// One entry in the append-only trace of a triage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageMessage {
    pub role: MessageRole,
    pub content: String,
}

impl TriageMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
        }
    }
}

// Pipeline errors.

/// Fatal failures of a single triage run.
///
/// Any of these aborts the remaining stages for the ticket.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("classification failed: {0:#}")]
    Classification(Err),
    #[error("unknown order `{order_id}`")]
    OrderNotFound { order_id: String },
    #[error("drafting failed: {0:#}")]
    Draft(Err),
    #[error("drafted reply was empty")]
    EmptyReply,
    #[error("stage `{stage}` requires `{field}` to be set")]
    MissingField { stage: &'static str, field: &'static str },
}

impl From<OrderError> for TriageError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound { order_id } => TriageError::OrderNotFound { order_id },
        }
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_type_wire_names() {
        let json = serde_json::to_string(&IssueType::DamagedItem).unwrap();
        assert_eq!(json, "\"damaged_item\"");

        for issue_type in IssueType::ALL {
            assert_eq!(issue_type.as_str().parse::<IssueType>().unwrap(), issue_type);
        }

        assert!("broken".parse::<IssueType>().is_err());
    }

    #[test]
    fn test_classification_requires_both_fields() {
        let ok: IssueClassification = serde_json::from_str(r#"{"issue_type": "late_delivery", "evidence": "still waiting"}"#).unwrap();
        assert_eq!(ok.issue_type, IssueType::LateDelivery);

        assert!(serde_json::from_str::<IssueClassification>(r#"{"issue_type": "late_delivery"}"#).is_err());
        assert!(serde_json::from_str::<IssueClassification>(r#"{"issue_type": "late_delivery", "reasoning": "x"}"#).is_err());
        assert!(serde_json::from_str::<IssueClassification>(r#"{"issue_type": "lost_parcel", "evidence": "x"}"#).is_err());
    }

    #[test]
    fn test_order_keeps_opaque_attributes() {
        let order: Order = serde_json::from_str(r#"{"order_id": "ORD1234", "status": "delivered", "items": ["mug"]}"#).unwrap();

        assert_eq!(order.order_id, "ORD1234");
        assert_eq!(order.attributes["status"], "delivered");
        assert_eq!(order.attributes["items"][0], "mug");
    }

    #[test]
    fn test_order_error_maps_to_order_not_found() {
        let err: TriageError = OrderError::NotFound { order_id: "ORD9999".to_string() }.into();
        assert!(matches!(err, TriageError::OrderNotFound { ref order_id } if order_id == "ORD9999"));
    }
}
