use tracing::{info, warn};

use supplybot_core::{
    ApplicationError, EntityExtractor, HeuristicExtractor, QueryRouter, RouteOutcome, SupplyLookup,
};

use crate::composer::{ComposeError, ResponseComposer};
use crate::llm::LlmClient;

/// Answers one chat query: route to the store, then let the model word it.
pub struct AgentRuntime<L, C, E = HeuristicExtractor> {
    router: QueryRouter<L, E>,
    composer: ResponseComposer<C>,
}

impl<L, C, E> AgentRuntime<L, C, E>
where
    L: SupplyLookup,
    C: LlmClient,
    E: EntityExtractor,
{
    pub fn new(router: QueryRouter<L, E>, composer: ResponseComposer<C>) -> Self {
        Self { router, composer }
    }

    pub fn router(&self) -> &QueryRouter<L, E> {
        &self.router
    }

    pub async fn handle_query(&self, query: &str) -> Result<String, ApplicationError> {
        let data = match self.router.route(query).await {
            RouteOutcome::Reply(reply) => {
                info!(event_name = "agent.query.direct_reply", "answered without generation");
                return Ok(reply);
            }
            RouteOutcome::Data(data) => data,
        };

        let reply = self.composer.compose(query, &data).await.map_err(|error| {
            warn!(event_name = "agent.query.compose_failed", error = %error, "response composition failed");
            match error {
                ComposeError::Prompt(error) => ApplicationError::Configuration(error.to_string()),
                ComposeError::Generation(error) => ApplicationError::Integration(format!("{error:#}")),
            }
        })?;

        info!(event_name = "agent.query.answered", reply_chars = reply.len(), "query answered");
        Ok(reply)
    }
}
