//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::PathBuf, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default OpenAI model to use.
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default sampling temperature; zero keeps classification repeatable.
fn default_openai_temperature() -> f32 {
    0.0
}

/// Default max output tokens for the OpenAI model.
fn default_openai_max_tokens() -> u32 {
    1024
}

/// Default per-request timeout, in seconds.
fn default_openai_timeout_secs() -> u64 {
    120
}

/// Default location of the order dataset.
fn default_orders_path() -> PathBuf {
    PathBuf::from("mock_data/orders.json")
}

fn default_classifier_directive() -> String {
    prompts::CLASSIFIER_DIRECTIVE.to_string()
}

fn default_drafter_directive() -> String {
    prompts::DRAFTER_DIRECTIVE.to_string()
}

/// Configuration for the ticket-triage application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Settings; each field can be set in the TOML file by its name, or through the
/// environment as `TICKET_TRIAGE_` + the upper-cased name.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// OpenAI API key (`TICKET_TRIAGE_OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// OpenAI model used for both classification and drafting (`TICKET_TRIAGE_OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Sampling temperature (`TICKET_TRIAGE_OPENAI_TEMPERATURE`), between 0 and 2.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens (`TICKET_TRIAGE_OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Timeout for a single OpenAI request (`TICKET_TRIAGE_OPENAI_TIMEOUT_SECS`).
    /// Requests are never retried.
    #[serde(default = "default_openai_timeout_secs")]
    pub openai_timeout_secs: u64,
    /// Path to the JSON order dataset (`TICKET_TRIAGE_ORDERS_PATH`).
    #[serde(default = "default_orders_path")]
    pub orders_path: PathBuf,
    /// Optional custom classifier directive (`TICKET_TRIAGE_CLASSIFIER_DIRECTIVE`).
    #[serde(default = "default_classifier_directive")]
    pub classifier_directive: String,
    /// Optional custom drafter directive (`TICKET_TRIAGE_DRAFTER_DIRECTIVE`).
    #[serde(default = "default_drafter_directive")]
    pub drafter_directive: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_model: default_openai_model(),
            openai_temperature: default_openai_temperature(),
            openai_max_tokens: default_openai_max_tokens(),
            openai_timeout_secs: default_openai_timeout_secs(),
            orders_path: default_orders_path(),
            classifier_directive: default_classifier_directive(),
            drafter_directive: default_drafter_directive(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TICKET_TRIAGE"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let inner: ConfigInner = cfg.build()?.try_deserialize()?;
        let result = Config::from(inner);

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.openai_temperature < 0.0 || self.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if self.openai_timeout_secs == 0 {
            return Err(anyhow::anyhow!("OpenAI timeout must be at least one second."));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_applies_defaults() {
        let file = write_config(r#"openai_api_key = "sk-test""#);

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.openai_temperature, 0.0);
        assert_eq!(config.orders_path, PathBuf::from("mock_data/orders.json"));
        assert_eq!(config.classifier_directive, prompts::CLASSIFIER_DIRECTIVE);
    }

    #[test]
    fn test_load_rejects_out_of_range_temperature() {
        let file = write_config(
            r#"
openai_api_key = "sk-test"
openai_temperature = 2.5
"#,
        );

        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let file = write_config(
            r#"
openai_api_key = "sk-test"
openai_timeout_secs = 0
"#,
        );

        assert!(Config::load(Some(file.path())).is_err());
    }
}
