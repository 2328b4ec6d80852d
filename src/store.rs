// src/store.rs
//
// Persistence collaborator for the results pipeline. All access goes through
// an explicitly injected pool; batch creation is one transaction so a
// half-written batch is never visible to readers.

use std::collections::HashMap;

use sqlx::{PgPool, Row};

use crate::error::AppError;
use crate::models::assessment::{
    Alternative, Assessment, AssessmentSummary, Indicator, IndicatorKind, Question, SpecMatrix,
};
use crate::models::result::{ResultBatch, StudentResultRow};
use crate::models::student::Student;
use crate::scoring::scorer::ScoredStudent;

/// Loads an assessment with its matrix, ordered questions, alternatives and
/// indicator assignments. Returns `None` when the id is unknown.
pub async fn load_assessment(pool: &PgPool, id: i64) -> Result<Option<Assessment>, AppError> {
    let head = sqlx::query(
        r#"
        SELECT a.id, a.label, m.id AS matrix_id, m.name AS matrix_name, m.total_questions
        FROM assessments a
        JOIN spec_matrices m ON m.id = a.matrix_id
        WHERE a.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(head) = head else {
        return Ok(None);
    };

    let matrix = SpecMatrix {
        id: head.get("matrix_id"),
        name: head.get("matrix_name"),
        total_questions: head.get("total_questions"),
    };

    let question_rows = sqlx::query(
        "SELECT id, number, content FROM questions WHERE assessment_id = $1 ORDER BY number",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut questions: Vec<Question> = question_rows
        .iter()
        .map(|row| Question {
            id: row.get("id"),
            number: row.get("number"),
            content: row.get("content"),
            alternatives: Vec::new(),
            indicators: Vec::new(),
        })
        .collect();
    let index_by_id: HashMap<i64, usize> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.id, i))
        .collect();

    let alternative_rows = sqlx::query(
        r#"
        SELECT al.id, al.question_id, al.letter, al.content, al.is_correct
        FROM alternatives al
        JOIN questions q ON q.id = al.question_id
        WHERE q.assessment_id = $1
        ORDER BY al.question_id, al.letter
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    for row in alternative_rows {
        let question_id: i64 = row.get("question_id");
        if let Some(&i) = index_by_id.get(&question_id) {
            questions[i].alternatives.push(Alternative {
                id: row.get("id"),
                question_id,
                letter: row.get("letter"),
                content: row.get("content"),
                is_correct: row.get("is_correct"),
            });
        }
    }

    let indicator_rows = sqlx::query(
        r#"
        SELECT qi.question_id, i.id, i.kind, i.description, i.target_questions
        FROM question_indicators qi
        JOIN indicators i ON i.id = qi.indicator_id
        JOIN questions q ON q.id = qi.question_id
        WHERE q.assessment_id = $1
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    for row in indicator_rows {
        let question_id: i64 = row.get("question_id");
        let kind: String = row.get("kind");
        let kind = IndicatorKind::from_db(&kind).ok_or_else(|| {
            AppError::InternalServerError(format!("Unknown indicator kind: {}", kind))
        })?;
        if let Some(&i) = index_by_id.get(&question_id) {
            questions[i].indicators.push(Indicator {
                id: row.get("id"),
                kind,
                description: row.get("description"),
                target_questions: row.get("target_questions"),
            });
        }
    }

    Ok(Some(Assessment {
        id: head.get("id"),
        label: head.get("label"),
        matrix,
        questions,
    }))
}

/// Lists all assessments with their matrix name and authored question count.
pub async fn list_assessments(pool: &PgPool) -> Result<Vec<AssessmentSummary>, AppError> {
    let summaries = sqlx::query_as::<_, AssessmentSummary>(
        r#"
        SELECT
            a.id,
            a.label,
            m.name AS matrix_name,
            m.total_questions,
            (SELECT COUNT(*) FROM questions q WHERE q.assessment_id = a.id) AS question_count
        FROM assessments a
        JOIN spec_matrices m ON m.id = a.matrix_id
        ORDER BY a.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(summaries)
}

/// Persists one scored upload atomically: the batch row, lazily-created
/// students, per-student results and per-answer outcomes. Any failure rolls
/// the whole transaction back.
pub async fn insert_batch(
    pool: &PgPool,
    assessment: &Assessment,
    pass_threshold: f64,
    students: &[ScoredStudent],
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let name = format!(
        "Resultados {} - {}",
        assessment.label,
        chrono::Utc::now().format("%d-%m-%Y")
    );

    let batch_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO result_batches (assessment_id, name, pass_threshold, total_students)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(assessment.id)
    .bind(&name)
    .bind(pass_threshold)
    .bind(students.len() as i64)
    .fetch_one(&mut *tx)
    .await?;

    for student in students {
        // Upsert by natural key keeps student creation idempotent, so two
        // concurrent uploads seeing the same new student never collide.
        let persisted = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (natural_key, given_name, family_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (natural_key) DO UPDATE
                SET given_name = EXCLUDED.given_name,
                    family_name = EXCLUDED.family_name
            RETURNING id, natural_key, given_name, family_name, created_at
            "#,
        )
        .bind(&student.student_key)
        .bind(&student.given_name)
        .bind(&student.family_name)
        .fetch_one(&mut *tx)
        .await?;

        let result_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO student_results (batch_id, student_id, total_points, max_points, percentage, grade)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(batch_id)
        .bind(persisted.id)
        .bind(student.total_points)
        .bind(student.max_points)
        .bind(student.percentage)
        .bind(student.grade)
        .fetch_one(&mut *tx)
        .await?;

        for outcome in &student.outcomes {
            sqlx::query(
                r#"
                INSERT INTO answer_outcomes (student_result_id, question_id, chosen_letter, is_correct, points)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(result_id)
            .bind(outcome.question_id)
            .bind(&outcome.chosen_letter)
            .bind(outcome.is_correct)
            .bind(outcome.points)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(batch_id)
}

/// Fetches one batch and its student results, or `None` when unknown.
pub async fn fetch_batch(
    pool: &PgPool,
    batch_id: i64,
) -> Result<Option<(ResultBatch, Vec<StudentResultRow>)>, AppError> {
    let batch = sqlx::query_as::<_, ResultBatch>(
        r#"
        SELECT id, assessment_id, name, pass_threshold, total_students, uploaded_at
        FROM result_batches
        WHERE id = $1
        "#,
    )
    .bind(batch_id)
    .fetch_optional(pool)
    .await?;

    let Some(batch) = batch else {
        return Ok(None);
    };

    let results = fetch_batch_results(pool, batch_id).await?;

    Ok(Some((batch, results)))
}

/// All batches of one assessment, newest upload first, each with its rows.
pub async fn list_batches(
    pool: &PgPool,
    assessment_id: i64,
) -> Result<Vec<(ResultBatch, Vec<StudentResultRow>)>, AppError> {
    let batches = sqlx::query_as::<_, ResultBatch>(
        r#"
        SELECT id, assessment_id, name, pass_threshold, total_students, uploaded_at
        FROM result_batches
        WHERE assessment_id = $1
        ORDER BY uploaded_at DESC
        "#,
    )
    .bind(assessment_id)
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(batches.len());
    for batch in batches {
        let results = fetch_batch_results(pool, batch.id).await?;
        out.push((batch, results));
    }

    Ok(out)
}

async fn fetch_batch_results(
    pool: &PgPool,
    batch_id: i64,
) -> Result<Vec<StudentResultRow>, AppError> {
    let rows = sqlx::query_as::<_, StudentResultRow>(
        r#"
        SELECT
            sr.id, sr.student_id, s.natural_key, s.given_name, s.family_name,
            sr.total_points, sr.max_points, sr.percentage, sr.grade
        FROM student_results sr
        JOIN students s ON s.id = sr.student_id
        WHERE sr.batch_id = $1
        ORDER BY sr.id
        "#,
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Deletes one batch with its results and outcomes in a single transaction.
/// Students are left untouched. Returns false when the batch is unknown.
pub async fn delete_batch(pool: &PgPool, batch_id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM answer_outcomes
        WHERE student_result_id IN (SELECT id FROM student_results WHERE batch_id = $1)
        "#,
    )
    .bind(batch_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM student_results WHERE batch_id = $1")
        .bind(batch_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM result_batches WHERE id = $1")
        .bind(batch_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(deleted.rows_affected() > 0)
}
