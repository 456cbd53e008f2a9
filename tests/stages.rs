mod common;

use common::{MockLlm, get_mock_llm, get_test_orders, llm};
use ticket_triage::{
    base::{
        prompts,
        types::{IssueClassification, IssueType, MessageRole, TriageError},
    },
    triage::{TriageState, TriageUpdate, classify::classify_issue, draft::draft_reply, lookup::fetch_order},
};

fn classified_state(order_id: &str) -> TriageState {
    TriageState::new("My order arrived broken").with_order_id(order_id).apply(TriageUpdate {
        classification: Some(IssueClassification {
            issue_type: IssueType::DamagedItem,
            evidence: "arrived broken".to_string(),
        }),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_classify_sets_classification_and_trace() {
    let mut mock = MockLlm::new();
    mock.expect_classify()
        .withf(|prompt| prompt.contains("My order ORD1234 arrived broken") && prompt.contains("- wrong_item"))
        .times(1)
        .returning(|_| {
            Ok(IssueClassification {
                issue_type: IssueType::DamagedItem,
                evidence: "arrived broken".to_string(),
            })
        });

    let state = TriageState::new("My order ORD1234 arrived broken").with_order_id("ORD1234");
    let update = classify_issue(&llm(mock), prompts::CLASSIFIER_DIRECTIVE, &state).await.unwrap();

    let state = state.apply(update);
    assert_eq!(state.issue_type(), Some(IssueType::DamagedItem));
    assert_eq!(state.evidence(), Some("arrived broken"));

    let trace: IssueClassification = serde_json::from_str(&state.messages()[0].content).unwrap();
    assert_eq!(trace.issue_type, IssueType::DamagedItem);
    assert_eq!(state.messages()[0].role, MessageRole::Assistant);
}

#[tokio::test]
async fn test_classify_failure_sets_nothing() {
    let mut mock = MockLlm::new();
    mock.expect_classify().returning(|_| Err(anyhow::anyhow!("Model output does not match the classification structure")));

    let state = TriageState::new("My order ORD1234 arrived broken").with_order_id("ORD1234");
    let result = classify_issue(&llm(mock), prompts::CLASSIFIER_DIRECTIVE, &state).await;

    assert!(matches!(result, Err(TriageError::Classification(_))));
    assert_eq!((state.issue_type(), state.evidence()), (None, None));
}

#[tokio::test]
async fn test_classify_requires_order_id() {
    let mut mock = MockLlm::new();
    mock.expect_classify().never();

    let result = classify_issue(&llm(mock), prompts::CLASSIFIER_DIRECTIVE, &TriageState::new("no id")).await;

    assert!(matches!(result, Err(TriageError::MissingField { field: "order_id", .. })));
}

#[test]
fn test_fetch_order_found() {
    let state = classified_state("ORD1234");

    let state = state.clone().apply(fetch_order(&get_test_orders(), &state).unwrap());

    assert_eq!(state.order().unwrap().attributes["status"], "delivered");
    assert_eq!(state.messages().last().unwrap().role, MessageRole::Tool);
}

#[test]
fn test_fetch_order_not_found() {
    let result = fetch_order(&get_test_orders(), &classified_state("ORD9999"));

    assert!(matches!(result, Err(TriageError::OrderNotFound { ref order_id }) if order_id == "ORD9999"));
}

#[tokio::test]
async fn test_draft_embeds_issue_and_order() {
    let mut mock = MockLlm::new();
    mock.expect_generate()
        .withf(|prompt| prompt.contains("damaged_item") && prompt.contains("ORD1234") && prompt.contains("Ceramic mug set"))
        .times(1)
        .returning(|_| Ok("  Sorry your mugs arrived damaged; a replacement is on its way.\n".to_string()));

    let state = classified_state("ORD1234");
    let state = state.clone().apply(fetch_order(&get_test_orders(), &state).unwrap());

    let state = state.clone().apply(draft_reply(&llm(mock), prompts::DRAFTER_DIRECTIVE, &state).await.unwrap());

    assert_eq!(state.recommendation(), Some("Sorry your mugs arrived damaged; a replacement is on its way."));
    assert_eq!(state.messages().last().unwrap().content, state.recommendation().unwrap());
}

#[tokio::test]
async fn test_draft_rejects_empty_reply() {
    let state = classified_state("ORD1234");
    let state = state.clone().apply(fetch_order(&get_test_orders(), &state).unwrap());

    let result = draft_reply(&llm(get_mock_llm(IssueType::DamagedItem, "   ")), prompts::DRAFTER_DIRECTIVE, &state).await;

    assert!(matches!(result, Err(TriageError::EmptyReply)));
}

#[tokio::test]
async fn test_draft_requires_order_context() {
    let mut mock = MockLlm::new();
    mock.expect_generate().never();

    let result = draft_reply(&llm(mock), prompts::DRAFTER_DIRECTIVE, &classified_state("ORD1234")).await;

    assert!(matches!(result, Err(TriageError::MissingField { field: "order", .. })));
}
