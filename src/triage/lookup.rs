//! Order lookup tool step.

use serde_json::json;

use crate::{prelude::*, service::orders::OrderRepository};

use super::state::{TriageState, TriageUpdate};

/// Resolve the ticket's order from the repository.
///
/// An unknown id is fatal for the run: drafting never proceeds without order
/// context.
#[instrument(name = "Triage::fetch_order", skip_all)]
pub fn fetch_order(orders: &OrderRepository, state: &TriageState) -> Result<TriageUpdate, TriageError> {
    let order_id = state.order_id().ok_or(TriageError::MissingField {
        stage: "fetch_order",
        field: "order_id",
    })?;

    let order = orders.lookup(order_id)?;
    info!("Fetched order `{order_id}`.");

    let trace = json!({ "tool": "fetch_order", "order": &order }).to_string();

    Ok(TriageUpdate {
        order: Some(order),
        messages: vec![TriageMessage::tool(trace)],
        ..Default::default()
    })
}
