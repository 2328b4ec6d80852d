// src/scoring/ingest.rs

use std::collections::HashSet;

use crate::error::AppError;
use crate::models::assessment::Assessment;

/// The two accepted answer-sheet layouts, detected from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// `id;nombre;respuesta;pregunta` - one synthetic key and a combined
    /// full name per row.
    Compact,
    /// `rut,nombre,apellido,pregunta_id,alternativa_dada` - natural key
    /// plus split given/family name.
    Extended,
}

/// One validated answer, the fixed record both layouts normalize into.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRow {
    pub student_key: String,
    pub given_name: String,
    pub family_name: String,
    pub question_number: i64,

    /// Upper-cased alternative letter as given by the student.
    pub chosen_letter: String,
}

/// Outcome of parsing one uploaded file.
#[derive(Debug)]
pub struct ParsedSheet {
    pub layout: SheetLayout,
    pub rows: Vec<AnswerRow>,

    /// Rows dropped by the documented tolerances: missing fields, a
    /// non-numeric question reference, or a question number the assessment
    /// does not contain.
    pub skipped_rows: usize,
}

const COMPACT_COLUMNS: [&str; 4] = ["id", "nombre", "respuesta", "pregunta"];
const EXTENDED_COLUMNS: [&str; 5] = ["rut", "nombre", "apellido", "pregunta_id", "alternativa_dada"];

/// Parses raw answer-sheet bytes against an assessment definition.
///
/// The delimiter is `;` when the header contains one, `,` otherwise.
/// Headers are matched case-insensitively and in any column order.
pub fn parse_sheet(bytes: &[u8], assessment: &Assessment) -> Result<ParsedSheet, AppError> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(AppError::EmptyBatch(
            "The CSV file must contain a header and at least one data row".to_string(),
        ));
    }

    let delimiter = if lines[0].contains(';') { ';' } else { ',' };
    let headers: Vec<String> = lines[0]
        .split(delimiter)
        .map(|h| h.trim().to_lowercase())
        .collect();

    let layout = detect_layout(&headers).ok_or_else(|| {
        AppError::UnsupportedFormat(format!(
            "Unrecognized CSV header: {}. Expected columns {} or {}",
            headers.join(", "),
            EXTENDED_COLUMNS.join(", "),
            COMPACT_COLUMNS.join(", ")
        ))
    })?;

    let column_names: &[&str] = match layout {
        SheetLayout::Compact => &COMPACT_COLUMNS,
        SheetLayout::Extended => &EXTENDED_COLUMNS,
    };
    // Presence was checked by detect_layout, so position always succeeds.
    let positions: Vec<usize> = column_names
        .iter()
        .map(|name| headers.iter().position(|h| h == name).unwrap())
        .collect();

    let known_numbers: HashSet<i64> = assessment.questions.iter().map(|q| q.number).collect();

    let mut rows = Vec::new();
    let mut skipped_rows = 0usize;

    for line in &lines[1..] {
        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        let values: Option<Vec<&str>> = positions
            .iter()
            .map(|&i| fields.get(i).copied().filter(|v| !v.is_empty()))
            .collect();
        let Some(values) = values else {
            skipped_rows += 1;
            continue;
        };

        let row = match layout {
            SheetLayout::Compact => {
                // id, nombre, respuesta, pregunta
                let (given_name, family_name) = split_full_name(values[1]);
                build_row(values[0], given_name, family_name, values[3], values[2])
            }
            SheetLayout::Extended => {
                // rut, nombre, apellido, pregunta_id, alternativa_dada
                build_row(
                    values[0],
                    values[1].to_string(),
                    values[2].to_string(),
                    values[3],
                    values[4],
                )
            }
        };

        match row {
            Some(row) if known_numbers.contains(&row.question_number) => rows.push(row),
            // Unknown question references and malformed numbers are
            // tolerated, not treated as errors.
            _ => skipped_rows += 1,
        }
    }

    Ok(ParsedSheet {
        layout,
        rows,
        skipped_rows,
    })
}

fn detect_layout(headers: &[String]) -> Option<SheetLayout> {
    let present = |columns: &[&str]| columns.iter().all(|c| headers.iter().any(|h| h == c));

    if present(&EXTENDED_COLUMNS) {
        Some(SheetLayout::Extended)
    } else if present(&COMPACT_COLUMNS) {
        Some(SheetLayout::Compact)
    } else {
        None
    }
}

/// Splits a combined full name on the first space: first token is the given
/// name, the remainder (possibly empty) the family name.
fn split_full_name(full: &str) -> (String, String) {
    match full.split_once(' ') {
        Some((given, family)) => (given.to_string(), family.trim().to_string()),
        None => (full.to_string(), String::new()),
    }
}

fn build_row(
    student_key: &str,
    given_name: String,
    family_name: String,
    question_number: &str,
    chosen_letter: &str,
) -> Option<AnswerRow> {
    let question_number = question_number.parse::<i64>().ok()?;
    Some(AnswerRow {
        student_key: student_key.to_string(),
        given_name,
        family_name,
        question_number,
        chosen_letter: chosen_letter.to_uppercase(),
    })
}
