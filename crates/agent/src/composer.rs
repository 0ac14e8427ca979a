use tera::{Context, Tera};
use thiserror::Error;
use tracing::debug;

use crate::llm::LlmClient;

const PROMPT_TEMPLATE_NAME: &str = "supply_chain_prompt";

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a supply chain assistant. Provide a concise, clear response to the user's query based on the data provided.
Query: {{ query }}
Data: {{ data }}
Response:
";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("prompt template error: {0}")]
    Prompt(#[from] tera::Error),
    #[error("{0:#}")]
    Generation(anyhow::Error),
}

pub struct PromptTemplate {
    tera: Tera,
}

impl PromptTemplate {
    pub fn new(source: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(PROMPT_TEMPLATE_NAME, source)?;
        Ok(Self { tera })
    }

    pub fn standard() -> Result<Self, tera::Error> {
        Self::new(DEFAULT_PROMPT_TEMPLATE)
    }

    pub fn render(&self, query: &str, data: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("query", query);
        context.insert("data", data);
        self.tera.render(PROMPT_TEMPLATE_NAME, &context)
    }
}

/// Words a data string for the user through the text-generation client.
pub struct ResponseComposer<C> {
    client: C,
    template: PromptTemplate,
}

impl<C> ResponseComposer<C>
where
    C: LlmClient,
{
    pub fn new(client: C, template: PromptTemplate) -> Self {
        Self { client, template }
    }

    pub fn with_standard_prompt(client: C) -> Result<Self, ComposeError> {
        Ok(Self::new(client, PromptTemplate::standard()?))
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn compose(&self, query: &str, data: &str) -> Result<String, ComposeError> {
        let prompt = self.template.render(query, data)?;
        debug!(event_name = "agent.compose.prompt_rendered", prompt_chars = prompt.len());

        let generated = self.client.complete(&prompt).await.map_err(ComposeError::Generation)?;
        Ok(generated.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::{ComposeError, PromptTemplate, ResponseComposer};
    use crate::llm::LlmClient;

    #[derive(Default)]
    struct RecordingClient {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    #[async_trait]
    impl LlmClient for RecordingClient {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().map_err(|_| anyhow!("poisoned"))?.push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("text-generation service returned 503 Service Unavailable"))
        }
    }

    #[test]
    fn standard_prompt_embeds_query_and_data() {
        let prompt = PromptTemplate::standard()
            .expect("template")
            .render("stock of ProductY", "ProductY is out of stock.")
            .expect("render");

        assert!(prompt.starts_with("You are a supply chain assistant."));
        assert!(prompt.contains("Query: stock of ProductY\n"));
        assert!(prompt.contains("Data: ProductY is out of stock.\n"));
        assert!(prompt.trim_end().ends_with("Response:"));
    }

    #[test]
    fn prompt_values_are_not_html_escaped() {
        let prompt = PromptTemplate::standard()
            .expect("template")
            .render("what's <new>?", "A & B")
            .expect("render");

        assert!(prompt.contains("what's <new>?"));
        assert!(prompt.contains("A & B"));
    }

    #[test]
    fn malformed_template_is_rejected() {
        assert!(PromptTemplate::new("Query: {{ query").is_err());
    }

    #[tokio::test]
    async fn compose_trims_generated_text() {
        let client = RecordingClient {
            reply: "\n  ProductY is currently out of stock.  \n".to_string(),
            ..RecordingClient::default()
        };
        let composer = ResponseComposer::with_standard_prompt(client).expect("composer");

        let reply =
            composer.compose("stock of ProductY", "ProductY is out of stock.").await.expect("reply");

        assert_eq!(reply, "ProductY is currently out of stock.");
        let prompts = composer.client().prompts.lock().expect("prompts");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Data: ProductY is out of stock."));
    }

    #[tokio::test]
    async fn generation_failure_keeps_upstream_message() {
        let composer = ResponseComposer::with_standard_prompt(FailingClient).expect("composer");

        let error = composer.compose("order 456", "Pending").await.expect_err("should fail");

        assert!(matches!(error, ComposeError::Generation(_)));
        assert!(error.to_string().contains("503 Service Unavailable"));
    }
}
