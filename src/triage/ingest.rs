//! Ingestion: resolve the ticket's order id.

use std::sync::OnceLock;

use regex::Regex;

use crate::prelude::*;

use super::state::{TriageState, TriageUpdate};

static ORDER_ID_PATTERN: OnceLock<Regex> = OnceLock::new();

fn get_order_id_pattern() -> &'static Regex {
    ORDER_ID_PATTERN.get_or_init(|| Regex::new(r"(?i)ORD[0-9]{4}").expect("order id pattern is valid"))
}

/// Find the first `ORD` + four digit order id in `text`, normalized to uppercase.
///
/// Only ASCII digits count, and the match is not anchored: `ORD12345` yields
/// `ORD1234`.
pub fn extract_order_id(text: &str) -> Option<String> {
    get_order_id_pattern().find(text).map(|m| m.as_str().to_uppercase())
}

/// Resolve the order id for a ticket.
///
/// A supplied, non-empty order id always wins; otherwise the ticket text is
/// searched.  Finding nothing is a normal outcome and leaves the id unset.
#[instrument(name = "Triage::ingest", skip_all)]
pub fn ingest(state: &TriageState) -> TriageUpdate {
    let order_id = match state.order_id() {
        Some(_) => None,
        None => extract_order_id(state.ticket_text()),
    };

    info!("Ticket loaded; order id: {:?}.", state.order_id().map(str::to_string).or_else(|| order_id.clone()));

    TriageUpdate { order_id, ..Default::default() }
}
