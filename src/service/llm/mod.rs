//! Integration with Large Language Model services.
//!
//! The pipeline consumes two capabilities from a model: structured issue
//! classification and free-text generation.  The `GenericLlmClient` trait
//! captures exactly those, with a default implementation for OpenAI.

pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{IssueClassification, Res};

// Traits.

/// Generic LLM client trait that clients must implement.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Classify a prompt into the closed issue category set.
    ///
    /// Implementations must constrain the model to the two-field
    /// `{issue_type, evidence}` structure and fail if it does not comply.
    async fn classify(&self, prompt: &str) -> Res<IssueClassification>;

    /// Generate free text from a prompt.
    async fn generate(&self, prompt: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
