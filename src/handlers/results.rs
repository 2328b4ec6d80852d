// src/handlers/results.rs

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    config,
    error::AppError,
    models::result::{BatchDetail, BatchQuery, BatchSummary, StudentView, UploadResponse},
    scoring::{
        answer_key::AnswerKey,
        export,
        grade::{self, PassThreshold},
        ingest,
        scorer::{self, ScoredStudent},
        stats::{ClassStatistics, GradedEntry},
    },
    store,
};

/// Ingests a multipart answer-sheet upload and scores it as one batch.
///
/// Expects a `file` part plus an `evaluacionId` part, and optionally
/// `nivelExigencia` (defaults to 60). The whole run is one unit of work:
/// parse, score, then persist everything in a single transaction.
pub async fn upload_results(
    State(pool): State<PgPool>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut assessment_id: Option<i64> = None;
    let mut threshold_value: Option<f64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("evaluacionId") | Some("assessmentId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                assessment_id = Some(text.trim().parse().map_err(|_| {
                    AppError::BadRequest("evaluacionId must be a number".to_string())
                })?);
            }
            Some("nivelExigencia") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                threshold_value = Some(text.trim().parse().map_err(|_| {
                    AppError::BadRequest("nivelExigencia must be a number".to_string())
                })?);
            }
            _ => {}
        }
    }

    let (Some(file_bytes), Some(assessment_id)) = (file_bytes, assessment_id) else {
        return Err(AppError::BadRequest(
            "File and assessment id are required".to_string(),
        ));
    };

    let threshold =
        PassThreshold::new(threshold_value.unwrap_or(config::DEFAULT_PASS_THRESHOLD))?;

    let assessment = store::load_assessment(&pool, assessment_id)
        .await?
        .ok_or(AppError::BadRequest("Assessment not found".to_string()))?;

    let sheet = ingest::parse_sheet(&file_bytes, &assessment)?;
    let key = AnswerKey::build(&assessment);
    let students = scorer::score_sheet(&sheet.rows, &key, threshold);

    if students.is_empty() {
        return Err(AppError::BadRequest(
            "No valid answer rows found in the CSV".to_string(),
        ));
    }

    let batch_id = store::insert_batch(&pool, &assessment, threshold.value(), &students).await?;

    tracing::info!(
        "Scored batch {} for assessment {}: {} students, {} rows, {} skipped",
        batch_id,
        assessment.id,
        students.len(),
        sheet.rows.len(),
        sheet.skipped_rows
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            result_batch_id: batch_id,
            student_count: students.len(),
            row_count: sheet.rows.len(),
            skipped_row_count: sheet.skipped_rows,
            assessment_label: assessment.label,
        }),
    ))
}

/// Lists the batches of one assessment with embedded quick statistics.
pub async fn list_batches(
    State(pool): State<PgPool>,
    Path(assessment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    store::load_assessment(&pool, assessment_id)
        .await?
        .ok_or(AppError::NotFound("Assessment not found".to_string()))?;

    let batches = store::list_batches(&pool, assessment_id).await?;

    let summaries: Vec<BatchSummary> = batches
        .into_iter()
        .map(|(batch, rows)| {
            let entries: Vec<GradedEntry> = rows
                .iter()
                .map(|r| GradedEntry {
                    percentage: r.percentage,
                    grade: r.grade,
                })
                .collect();
            BatchSummary {
                id: batch.id,
                name: batch.name,
                uploaded_at: batch.uploaded_at,
                total_students: batch.total_students,
                pass_threshold: batch.pass_threshold,
                statistics: ClassStatistics::compute(&entries),
            }
        })
        .collect();

    Ok(Json(summaries))
}

/// Retrieves one batch with its students and recomputed statistics.
///
/// An optional `nivelExigencia` query parameter re-curves every grade from
/// the stored percentages, so operators can preview a different threshold
/// without creating a new batch.
pub async fn get_batch(
    State(pool): State<PgPool>,
    Path(batch_id): Path<i64>,
    Query(params): Query<BatchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (batch, rows) = store::fetch_batch(&pool, batch_id)
        .await?
        .ok_or(AppError::NotFound("Result batch not found".to_string()))?;

    let recurve = params.nivel_exigencia.map(PassThreshold::new).transpose()?;

    let students: Vec<StudentView> = rows
        .iter()
        .map(|row| {
            let grade = match recurve {
                Some(threshold) => grade::grade_for(row.percentage, threshold),
                None => row.grade,
            };
            StudentView {
                natural_key: row.natural_key.clone(),
                given_name: row.given_name.clone(),
                family_name: row.family_name.clone(),
                total_points: row.total_points,
                max_points: row.max_points,
                percentage: row.percentage,
                grade,
                passed: grade >= config::PASSING_GRADE,
            }
        })
        .collect();

    let entries: Vec<GradedEntry> = students
        .iter()
        .map(|s| GradedEntry {
            percentage: s.percentage,
            grade: s.grade,
        })
        .collect();

    Ok(Json(BatchDetail {
        id: batch.id,
        assessment_id: batch.assessment_id,
        name: batch.name,
        uploaded_at: batch.uploaded_at,
        pass_threshold: recurve
            .map(|t| t.value())
            .unwrap_or(batch.pass_threshold),
        students,
        statistics: ClassStatistics::compute(&entries),
    }))
}

/// Exports one batch as the contractual CSV attachment.
pub async fn export_batch(
    State(pool): State<PgPool>,
    Path(batch_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (batch, rows) = store::fetch_batch(&pool, batch_id)
        .await?
        .ok_or(AppError::NotFound("Result batch not found".to_string()))?;

    let threshold = PassThreshold::new(batch.pass_threshold)?;

    let students: Vec<ScoredStudent> = rows
        .into_iter()
        .map(|row| ScoredStudent {
            student_key: row.natural_key,
            given_name: row.given_name,
            family_name: row.family_name,
            total_points: row.total_points,
            max_points: row.max_points,
            percentage: row.percentage,
            grade: row.grade,
            outcomes: Vec::new(),
        })
        .collect();

    let csv = export::render_csv(&students, threshold);

    let filename = format!("resultados_{}.csv", batch.id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}

/// Deletes one batch. Students created by it are kept.
pub async fn delete_batch(
    State(pool): State<PgPool>,
    Path(batch_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = store::delete_batch(&pool, batch_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Result batch not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
