//! Reply drafting.

use crate::{base::prompts, prelude::*, service::llm::LlmClient};

use super::state::{TriageState, TriageUpdate};

/// Draft a short customer-facing reply from the classified issue and its order.
///
/// The model's text is trimmed of surrounding whitespace before it becomes the
/// recommendation; a reply that is blank after trimming is an error.
#[instrument(name = "Triage::draft_reply", skip_all)]
pub async fn draft_reply(llm: &LlmClient, directive: &str, state: &TriageState) -> Result<TriageUpdate, TriageError> {
    let issue_type = state.issue_type().ok_or(TriageError::MissingField {
        stage: "draft_reply",
        field: "issue_type",
    })?;
    let order_id = state.order_id().ok_or(TriageError::MissingField {
        stage: "draft_reply",
        field: "order_id",
    })?;
    let order = state.order().ok_or(TriageError::MissingField { stage: "draft_reply", field: "order" })?;

    let prompt = prompts::build_draft_prompt(directive, issue_type, order_id, order).map_err(TriageError::Draft)?;
    let reply = llm.generate(&prompt).await.map_err(TriageError::Draft)?;

    let reply = reply.trim();
    if reply.is_empty() {
        warn!("Model returned an empty reply.");
        return Err(TriageError::EmptyReply);
    }

    info!("Drafted reply for order `{order_id}`.");

    Ok(TriageUpdate {
        recommendation: Some(reply.to_string()),
        messages: vec![TriageMessage::assistant(reply)],
        ..Default::default()
    })
}
