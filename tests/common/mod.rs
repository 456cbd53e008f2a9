#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use serde_json::json;
use ticket_triage::{
    base::types::{IssueClassification, IssueType, Order, Res},
    service::{llm::GenericLlmClient, orders::OrderRepository},
};

// Mocks.

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        async fn classify(&self, prompt: &str) -> Res<IssueClassification>;
        async fn generate(&self, prompt: &str) -> Res<String>;
    }
}

/// A mock that classifies as `issue_type` and replies with `reply`.
pub fn get_mock_llm(issue_type: IssueType, reply: &'static str) -> MockLlm {
    let mut mock = MockLlm::new();

    mock.expect_classify().returning(move |_| {
        Ok(IssueClassification {
            issue_type,
            evidence: "The customer says the item arrived broken.".to_string(),
        })
    });
    mock.expect_generate().returning(move |_| Ok(reply.to_string()));

    mock
}

pub fn llm(mock: MockLlm) -> ticket_triage::service::llm::LlmClient {
    ticket_triage::service::llm::LlmClient::new(Arc::new(mock))
}

pub fn get_test_orders() -> OrderRepository {
    let orders: Vec<Order> = serde_json::from_value(json!([
        {
            "order_id": "ORD1234",
            "status": "delivered",
            "items": ["Ceramic mug set"],
            "delivery_date": "2025-01-14"
        },
        {
            "order_id": "ORD2345",
            "status": "in_transit",
            "items": ["Wireless headphones"]
        }
    ]))
    .expect("test orders are valid");

    OrderRepository::from_orders(orders)
}
