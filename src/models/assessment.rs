// src/models/assessment.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Indicator type: every indicator tags either content or skill coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Content,
    Skill,
}

impl IndicatorKind {
    /// Maps the database representation ('content' / 'skill').
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "content" => Some(IndicatorKind::Content),
            "skill" => Some(IndicatorKind::Skill),
            _ => None,
        }
    }
}

/// Specification matrix the assessment was authored against.
/// Defines how many questions the assessment must end up with.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SpecMatrix {
    pub id: i64,
    pub name: String,
    pub total_questions: i64,
}

/// One selectable alternative of a question.
/// Exactly one alternative per question is correct once the question is keyed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Alternative {
    pub id: i64,
    pub question_id: i64,

    /// Single letter label (A, B, C, ...), unique within its question.
    pub letter: String,

    pub content: String,
    pub is_correct: bool,
}

/// A learning-objective indicator assigned to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub kind: IndicatorKind,
    pub description: String,

    /// How many questions the matrix expects this indicator to cover.
    /// Informational only; the scorer does not enforce it.
    pub target_questions: i64,
}

/// A question with its alternatives and assigned indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// 1-based sequence number, unique within the assessment. Answer sheets
    /// reference questions by this number, not by the database id.
    pub number: i64,

    pub content: String,
    pub alternatives: Vec<Alternative>,
    pub indicators: Vec<Indicator>,
}

impl Question {
    pub fn correct_alternative(&self) -> Option<&Alternative> {
        self.alternatives.iter().find(|alt| alt.is_correct)
    }

    pub fn has_indicator(&self, kind: IndicatorKind) -> bool {
        self.indicators.iter().any(|ind| ind.kind == kind)
    }
}

/// A fully loaded assessment: definition plus matrix.
/// Read-only to the results pipeline; authored elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub label: String,
    pub matrix: SpecMatrix,

    /// Ordered by sequence number.
    pub questions: Vec<Question>,
}

/// Flat summary row for the assessment listing.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub id: i64,
    pub label: String,
    pub matrix_name: String,
    pub total_questions: i64,
    pub question_count: i64,
}
