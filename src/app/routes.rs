use crate::app::AppState;
use crate::domain::model::{GenerationRequest, GenerationResponse, HealthStatus};
use crate::utils::error::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

pub async fn generate_excuse(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>> {
    let Json(request) = payload?;
    let excuse = state.engine.generate(request.problem.as_deref()).await?;
    Ok(Json(GenerationResponse { excuse }))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
