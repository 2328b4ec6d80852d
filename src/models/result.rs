// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::scoring::stats::ClassStatistics;

/// Represents the 'result_batches' table: one immutable scored upload.
/// Re-scoring the same file creates a new batch instead of mutating this one.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBatch {
    pub id: i64,
    pub assessment_id: i64,
    pub name: String,

    /// Pass threshold (nivel de exigencia) the batch was graded with.
    pub pass_threshold: f64,

    pub total_students: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// One student's stored result joined with the student identity.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResultRow {
    pub id: i64,
    pub student_id: i64,
    pub natural_key: String,
    pub given_name: String,
    pub family_name: String,
    pub total_points: i64,
    pub max_points: i64,
    pub percentage: f64,
    pub grade: f64,
}

/// Response body for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub result_batch_id: i64,
    pub student_count: usize,
    pub row_count: usize,

    /// Rows dropped by the documented ingestion tolerances (missing fields,
    /// unknown question numbers). Surfaced for observability.
    pub skipped_row_count: usize,

    pub assessment_label: String,
}

/// Batch summary with embedded quick statistics for listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub id: i64,
    pub name: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub total_students: i64,
    pub pass_threshold: f64,
    pub statistics: ClassStatistics,
}

/// One student row in the batch detail view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub natural_key: String,
    pub given_name: String,
    pub family_name: String,
    pub total_points: i64,
    pub max_points: i64,
    pub percentage: f64,
    pub grade: f64,
    pub passed: bool,
}

/// Full batch detail: students plus recomputed statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetail {
    pub id: i64,
    pub assessment_id: i64,
    pub name: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub pass_threshold: f64,
    pub students: Vec<StudentView>,
    pub statistics: ClassStatistics,
}

/// Query parameters accepted by the batch detail endpoint.
/// A caller-supplied threshold re-curves grades from the stored percentages.
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    #[serde(rename = "nivelExigencia")]
    pub nivel_exigencia: Option<f64>,
}
