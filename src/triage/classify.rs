//! Issue classification.

use crate::{base::prompts, prelude::*, service::llm::LlmClient};

use super::state::{TriageState, TriageUpdate};

/// Classify the ticket into the closed issue set.
///
/// The model either returns a conforming `{issue_type, evidence}` pair or the
/// run fails; no fallback category is ever substituted.
#[instrument(name = "Triage::classify_issue", skip_all)]
pub async fn classify_issue(llm: &LlmClient, directive: &str, state: &TriageState) -> Result<TriageUpdate, TriageError> {
    if state.order_id().is_none() {
        return Err(TriageError::MissingField {
            stage: "classify_issue",
            field: "order_id",
        });
    }

    let prompt = prompts::build_classification_prompt(directive, state.ticket_text());

    let classification = llm.classify(&prompt).await.map_err(TriageError::Classification)?;
    let trace = serde_json::to_string(&classification).map_err(|err| TriageError::Classification(err.into()))?;

    info!("Classified ticket as `{}`.", classification.issue_type);
    debug!("Evidence: {}", classification.evidence);

    Ok(TriageUpdate {
        classification: Some(classification),
        messages: vec![TriageMessage::assistant(trace)],
        ..Default::default()
    })
}
