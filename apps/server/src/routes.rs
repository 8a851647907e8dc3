//! HTTP API: `POST /rag` for answers, `GET /health` for liveness.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use semagent_core::Agent;
use semagent_shared::SemagentError;

/// Shared handler state.
#[derive(Clone)]
pub(crate) struct ApiState {
    pub agent: Arc<Agent>,
}

/// Request body for `POST /rag`.
#[derive(Debug, Deserialize)]
pub(crate) struct AskRequest {
    pub question: String,
}

/// Response body for `POST /rag`.
#[derive(Debug, Serialize)]
pub(crate) struct AskResponse {
    pub answer: String,
}

/// Error body for failed requests.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub status: String,
    pub concepts: usize,
}

/// Build the application router.
pub(crate) fn router(agent: Arc<Agent>) -> Router {
    let state = ApiState { agent };

    Router::new()
        .route("/rag", post(rag_endpoint))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a pipeline error to an HTTP status.
///
/// Completion outages are the upstream's fault (502); everything else
/// that escapes the pipeline's inline degradation is a 500.
fn error_status(error: &SemagentError) -> StatusCode {
    match error {
        SemagentError::Completion(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn rag_endpoint(
    State(state): State<ApiState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::now_v7();
    info!(%request_id, question_len = request.question.len(), "question received");

    match state.agent.answer(&request.question).await {
        Ok(answer) => Ok(Json(AskResponse { answer })),
        Err(e) => {
            error!(%request_id, error = %e, "pipeline failed");
            Err((
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        concepts: state.agent.taxonomy().concept_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_failures_map_to_bad_gateway() {
        let err = SemagentError::Completion("HTTP 429".into());
        assert_eq!(error_status(&err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn other_failures_map_to_internal_error() {
        let err = SemagentError::Query("bad SPARQL".into());
        assert_eq!(error_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn request_and_response_wire_shapes() {
        let request: AskRequest =
            serde_json::from_str(r#"{"question": "o que é Categoria_Produtos"}"#)
                .expect("deserialize");
        assert_eq!(request.question, "o que é Categoria_Produtos");

        let response = serde_json::to_string(&AskResponse {
            answer: "resposta".into(),
        })
        .expect("serialize");
        assert_eq!(response, r#"{"answer":"resposta"}"#);
    }

    #[test]
    fn error_body_wire_shape() {
        let body = serde_json::to_string(&ErrorResponse {
            error: "completion error: HTTP 429".into(),
        })
        .expect("serialize");
        assert_eq!(body, r#"{"error":"completion error: HTTP 429"}"#);
    }
}
