//! OpenAI implementation of the LLM collaborator.
//!
//! Uses the Responses API.  Classification requests carry a strict JSON
//! schema so the model can only answer with `{issue_type, evidence}`; drafting
//! requests are plain text.  Requests are bounded by a timeout and are never
//! retried: any failure is returned to the caller as-is.

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use anyhow::Context;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        Content, CreateResponseArgs, Input, InputItem, InputMessageArgs, OutputContent, Response, ResponseFormatJsonSchema, Role, TextConfig, TextResponseFormat,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::base::{
    config::Config,
    types::{IssueClassification, IssueType, Res},
};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build a request around a single user prompt.
    fn build_request(&self, prompt: &str, text_config: TextConfig) -> Res<CreateResponseArgs> {
        let input = Input::Items(vec![InputItem::Message(InputMessageArgs::default().role(Role::User).content(prompt.to_string()).build()?)]);

        let mut request = CreateResponseArgs::default();
        request
            .max_output_tokens(self.config.openai_max_tokens)
            .model(&self.config.openai_model)
            .text(text_config)
            .input(input);

        // Reasoning models reject a sampling temperature.
        if self.config.openai_model.starts_with("gpt") {
            request.temperature(self.config.openai_temperature);
        }

        Ok(request)
    }

    /// Send a single request, bounded by the configured timeout.
    async fn call_openai_api(&self, request_builder: CreateResponseArgs) -> Res<Response> {
        let request = request_builder.build()?;
        let limit = Duration::from_secs(self.config.openai_timeout_secs);

        match timeout(limit, self.client.responses().create(request)).await {
            Ok(Ok(response)) => {
                info!("OpenAI API call succeeded.");
                Ok(response)
            }
            Ok(Err(err)) => Err(anyhow::anyhow!("OpenAI API call failed: {err}")),
            Err(_) => Err(anyhow::anyhow!("OpenAI API call timed out after {}s.", self.config.openai_timeout_secs)),
        }
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::classify", skip_all)]
    async fn classify(&self, prompt: &str) -> Res<IssueClassification> {
        let request = self.build_request(prompt, get_openai_classification_text_config().clone())?;
        let response = self.call_openai_api(request).await?;

        let text = parse_openai_response(&response)?.join("");
        debug!("Classification output: {text}");

        parse_classification(&text)
    }

    #[instrument(name = "OpenAiLlmClient::generate", skip_all)]
    async fn generate(&self, prompt: &str) -> Res<String> {
        let text_config = TextConfig { format: TextResponseFormat::Text };
        let request = self.build_request(prompt, text_config)?;
        let response = self.call_openai_api(request).await?;

        Ok(parse_openai_response(&response)?.join("\n\n"))
    }
}

/// Collect the output text of an OpenAI response.
#[instrument(skip_all)]
pub fn parse_openai_response(response: &Response) -> Res<Vec<String>> {
    let mut result = Vec::new();

    info!("LLM response has {} outputs.", response.output.len());
    for output in &response.output {
        match output {
            OutputContent::Message(message) => {
                for message_content in &message.content {
                    match message_content {
                        Content::OutputText(text) => result.push(text.text.clone()),
                        Content::Refusal(reason) => {
                            return Err(anyhow::anyhow!("Request refused: {reason:#?}"));
                        }
                    }
                }
            }
            _ => {
                warn!("Unexpected output: {output:#?}");
            }
        }
    }

    Ok(result)
}

/// Parse model output into a classification, failing on anything that does not
/// match the two-field structure.
pub fn parse_classification(text: &str) -> Res<IssueClassification> {
    serde_json::from_str(text.trim()).with_context(|| format!("Model output does not match the classification structure: `{text}`"))
}

// Statics.

static OPENAI_CLASSIFICATION_TEXT_CONFIG: OnceLock<TextConfig> = OnceLock::new();

fn get_openai_classification_text_config() -> &'static TextConfig {
    OPENAI_CLASSIFICATION_TEXT_CONFIG.get_or_init(|| {
        let categories = IssueType::ALL.iter().map(IssueType::as_str).collect::<Vec<_>>();

        TextConfig {
            format: TextResponseFormat::JsonSchema(ResponseFormatJsonSchema {
                name: "IssueClassification".to_string(),
                description: Some("Classification of a customer support ticket.".to_string()),
                schema: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "issue_type": {
                            "type": "string",
                            "enum": categories
                        },
                        "evidence": { "type": "string" }
                    },
                    "required": ["issue_type", "evidence"],
                    "additionalProperties": false
                })),
                strict: Some(true),
            }),
        }
    })
}

// Tests.
