//! Prompt templates for the classifier and drafter.
//!
//! Directives are overridable from config; the ticket-specific sections are
//! always appended by the builders below.

use crate::base::types::{IssueType, Order, Res};

/// Classifier directive.
pub const CLASSIFIER_DIRECTIVE: &str = r#####"
# Support Ticket Classifier

You are a support ticket classifier for an online store.  Read the customer's ticket and classify the issue into exactly ONE of the categories listed below.

Only choose `unknown` if none of the other categories reasonably apply.

Respond with a JSON object containing:
  - `issue_type`: the chosen category,
  - `evidence`: a brief explanation, quoting the part of the ticket that supports the choice.
"#####;

/// Drafter directive.
pub const DRAFTER_DIRECTIVE: &str = r#####"
# Customer Support Assistant

You are a customer support assistant for an online store.  Write a professional, helpful reply to the customer based on the issue type and the order details below.

## Guidelines

- Be concise and answer in only about 1 to 2 lines.
- Address the issue type directly; for damaged, missing, or wrong items offer a replacement or refund.
- Do not invent order details that are not provided.
"#####;

/// Build the classification prompt for a ticket.
pub fn build_classification_prompt(directive: &str, ticket_text: &str) -> String {
    let categories = IssueType::ALL.iter().map(|t| format!("- {t}")).collect::<Vec<_>>().join("\n");

    format!("{}\n\n## Categories\n\n{categories}\n\n## Ticket\n\n{ticket_text}\n", directive.trim())
}

/// Build the drafting prompt from the classified issue and its resolved order.
pub fn build_draft_prompt(directive: &str, issue_type: IssueType, order_id: &str, order: &Order) -> Res<String> {
    let order_context = serde_json::to_string_pretty(order)?;

    Ok(format!(
        "{}\n\n## Issue Type\n\n{issue_type}\n\n## Order ID\n\n{order_id}\n\n## Order Details\n\n```json\n{order_context}\n```\n",
        directive.trim()
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    #[test]
    fn test_classification_prompt_lists_every_category() {
        let prompt = build_classification_prompt(CLASSIFIER_DIRECTIVE, "My order ORD1234 arrived broken");

        for issue_type in IssueType::ALL {
            assert!(prompt.contains(&format!("- {issue_type}")));
        }
        assert!(prompt.ends_with("My order ORD1234 arrived broken\n"));
    }

    #[test]
    fn test_draft_prompt_embeds_order_context() {
        let mut attributes = Map::new();
        attributes.insert("status".to_string(), "delivered".into());
        let order = Order { order_id: "ORD1234".to_string(), attributes };

        let prompt = build_draft_prompt(DRAFTER_DIRECTIVE, IssueType::DamagedItem, "ORD1234", &order).unwrap();

        assert!(prompt.contains("damaged_item"));
        assert!(prompt.contains("ORD1234"));
        assert!(prompt.contains("\"status\": \"delivered\""));
        assert!(prompt.contains("1 to 2 lines"));
    }
}
