// src/models/student.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Represents the 'students' table.
///
/// Students are created lazily the first time their key shows up in an
/// uploaded answer sheet and are never deleted by the results pipeline.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,

    /// Stable identity key: a national id (rut) when the sheet carries one,
    /// or the synthetic row identifier of the compact layout.
    pub natural_key: String,

    pub given_name: String,
    pub family_name: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
