use ankita_core::{Answer, QueryError, RetrievalError};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::server::AppState;

pub(crate) const RUNNING_MESSAGE: &str = "Ankita backend is running.";

#[derive(serde::Deserialize)]
pub(crate) struct QueryRequest {
    pub question: String,
}

#[derive(serde::Serialize)]
struct RootResponse {
    message: &'static str,
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    documents: usize,
}

fn failure_status(err: &QueryError) -> StatusCode {
    match err {
        QueryError::Retrieval(RetrievalError::Embed(_) | RetrievalError::Search(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        QueryError::Generation(_) => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        message: RUNNING_MESSAGE,
    })
}

pub(crate) async fn query_handler(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> impl IntoResponse {
    match state.chain.invoke(&payload.question).await {
        Ok(output) => Json(Answer::from(output)).into_response(),
        Err(e) => {
            tracing::error!("error processing query: {e:?}");
            let status = if state.error_status {
                failure_status(&e)
            } else {
                StatusCode::OK
            };
            let body = ErrorResponse {
                error: format!("Failed to process query: {e}"),
            };
            (status, Json(body)).into_response()
        }
    }
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        documents: state.chain.document_count(),
    })
}
