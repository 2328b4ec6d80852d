// src/handlers/assessments.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{error::AppError, scoring::readiness::ReadinessState, store};

/// Lists all assessments with matrix name and authored question count.
pub async fn list_assessments(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let summaries = store::list_assessments(&pool).await?;
    Ok(Json(summaries))
}

/// Retrieves one assessment with its readiness classification.
pub async fn get_assessment(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let assessment = store::load_assessment(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Assessment not found".to_string()))?;

    let readiness = ReadinessState::classify(&assessment);

    Ok(Json(serde_json::json!({
        "id": assessment.id,
        "label": assessment.label,
        "matrix": assessment.matrix,
        "questionCount": assessment.questions.len(),
        "readiness": {
            "state": readiness,
            "description": readiness.description(),
        },
    })))
}

/// Readiness pre-check for an assessment, independent of any upload.
pub async fn get_readiness(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let assessment = store::load_assessment(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Assessment not found".to_string()))?;

    let readiness = ReadinessState::classify(&assessment);

    Ok(Json(serde_json::json!({
        "state": readiness,
        "description": readiness.description(),
    })))
}
