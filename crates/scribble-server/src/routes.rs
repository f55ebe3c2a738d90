//! HTTP routes.

use crate::model::{CLASS_NAMES, Model};
use crate::preprocess::{PreprocessError, preprocess};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use scribble_core::{ErrorResponse, PREDICT_PATH, PredictRequest, PredictResponse, Prediction};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared server state
pub struct AppState {
    model: Option<Arc<dyn Model>>,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn Model>>) -> Self {
        Self { model }
    }
}

/// Errors answered by `/predict`.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{0}")]
    Rejected(#[from] JsonRejection),
    #[error("{0}")]
    Preprocess(#[from] PreprocessError),
    #[error("Model is not loaded")]
    ModelNotLoaded,
    #[error("Class index {0} out of range")]
    UnknownClass(usize),
}

impl PredictError {
    fn status(&self) -> StatusCode {
        match self {
            PredictError::Rejected(rejection) => rejection.status(),
            PredictError::Preprocess(_) => StatusCode::BAD_REQUEST,
            PredictError::ModelNotLoaded | PredictError::UnknownClass(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Prediction failed ({}): {}", status, self);
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(PREDICT_PATH, post(predict))
        .route("/results", get(results))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "Scribble classification server - POST {\"image\": \"data:image/png;base64,...\"} to /predict"
}

/// Health check
async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct ResultsQuery {
    prediction: Option<String>,
}

/// Plain-text result page for a prediction passed in the query string.
async fn results(Query(query): Query<ResultsQuery>) -> String {
    match query.prediction.as_deref().filter(|p| !p.is_empty()) {
        Some(prediction) => format!("Prediction: {}", prediction),
        None => "Nothing to predict!".to_string(),
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let Json(request) = payload?;
    let input = preprocess(&request.image)?;
    let model = state.model.as_ref().ok_or(PredictError::ModelNotLoaded)?;

    let index = model.predict(&input);
    let label = CLASS_NAMES
        .get(index)
        .ok_or(PredictError::UnknownClass(index))?;
    info!("Predicted {}", label);

    Ok(Json(PredictResponse {
        prediction: Prediction::from(*label),
    }))
}
