//! Chat API routes.
//!
//! - `GET  /`        - liveness message
//! - `POST /query/`  - answer a supply-chain question (`{"query": ...}`)
//!
//! Failures while answering are reported as `500 {"detail": ...}`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use supplybot_agent::{llm::LlmClient, runtime::AgentRuntime};
use supplybot_core::{ApplicationError, EntityExtractor, InterfaceError, SupplyLookup};

pub const ROOT_MESSAGE: &str = "Supply Chain Chatbot is running!";

/// Anything that can turn a chat query into a reply.
#[async_trait]
pub trait QueryAnswerer: Send + Sync {
    async fn answer(&self, query: &str) -> Result<String, ApplicationError>;
}

#[async_trait]
impl<L, C, E> QueryAnswerer for AgentRuntime<L, C, E>
where
    L: SupplyLookup + 'static,
    C: LlmClient + 'static,
    E: EntityExtractor + 'static,
{
    async fn answer(&self, query: &str) -> Result<String, ApplicationError> {
        self.handle_query(query).await
    }
}

#[derive(Clone)]
pub struct ApiState {
    answerer: Arc<dyn QueryAnswerer>,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

pub fn router(answerer: Arc<dyn QueryAnswerer>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/query/", post(query))
        .route("/query", post(query))
        .with_state(ApiState { answerer })
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: ROOT_MESSAGE })
}

pub async fn query(
    State(state): State<ApiState>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "api.query.received",
        correlation_id = %correlation_id,
        query_chars = body.query.len(),
        "chat query received"
    );

    match state.answerer.answer(&body.query).await {
        Ok(response) => {
            info!(
                event_name = "api.query.answered",
                correlation_id = %correlation_id,
                "chat query answered"
            );
            Ok(Json(QueryResponse { response }))
        }
        Err(failure) => {
            let failure: InterfaceError = failure.into_interface(correlation_id);
            error!(
                event_name = "api.query.failed",
                correlation_id = %failure.correlation_id(),
                error = %failure.detail(),
                "chat query failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { detail: failure.detail().to_string() }),
            ))
        }
    }
}
