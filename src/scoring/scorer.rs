// src/scoring/scorer.rs

use std::collections::HashMap;

use super::answer_key::AnswerKey;
use super::grade::{self, PassThreshold};
use super::ingest::AnswerRow;

/// Per-question outcome retained for a scored student.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question_id: i64,
    pub question_number: i64,
    pub chosen_letter: String,
    pub is_correct: bool,
    pub points: i64,
}

/// One student's accumulated raw score plus the curved grade.
#[derive(Debug, Clone)]
pub struct ScoredStudent {
    pub student_key: String,
    pub given_name: String,
    pub family_name: String,

    /// Sum of points over matched answers (1 per correct answer).
    pub total_points: i64,

    /// Count of matched answers, regardless of correctness.
    pub max_points: i64,

    /// `total / max * 100`, or 0 when no answer matched the key.
    pub percentage: f64,

    pub grade: f64,
    pub outcomes: Vec<AnswerOutcome>,
}

/// Folds parsed answer rows into one result per distinct student key,
/// in first-seen order.
///
/// Rows whose question has no keyed correct letter contribute nothing to
/// either total or maximum, but still register the student: a student whose
/// answers all miss the key comes out with a maximum of 0 and 0%.
pub fn score_sheet(
    rows: &[AnswerRow],
    key: &AnswerKey,
    threshold: PassThreshold,
) -> Vec<ScoredStudent> {
    let mut students: Vec<ScoredStudent> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let idx = match index.get(&row.student_key) {
            Some(&idx) => idx,
            None => {
                students.push(ScoredStudent {
                    student_key: row.student_key.clone(),
                    given_name: row.given_name.clone(),
                    family_name: row.family_name.clone(),
                    total_points: 0,
                    max_points: 0,
                    percentage: 0.0,
                    grade: 0.0,
                    outcomes: Vec::new(),
                });
                index.insert(row.student_key.clone(), students.len() - 1);
                students.len() - 1
            }
        };

        let Some(keyed) = key.lookup(row.question_number) else {
            continue;
        };

        let is_correct = row.chosen_letter.eq_ignore_ascii_case(&keyed.correct_letter);
        let points = if is_correct { 1 } else { 0 };

        let student = &mut students[idx];
        student.total_points += points;
        student.max_points += 1;
        student.outcomes.push(AnswerOutcome {
            question_id: keyed.question_id,
            question_number: row.question_number,
            chosen_letter: row.chosen_letter.clone(),
            is_correct,
            points,
        });
    }

    for student in &mut students {
        student.percentage = if student.max_points > 0 {
            (student.total_points as f64 / student.max_points as f64) * 100.0
        } else {
            0.0
        };
        student.grade = grade::grade_for(student.percentage, threshold);
    }

    students
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Alternative, Assessment, Question, SpecMatrix};

    fn keyed_assessment(correct: &[(i64, Option<&str>)]) -> Assessment {
        let questions = correct
            .iter()
            .map(|&(number, letter)| Question {
                id: number + 100,
                number,
                content: String::new(),
                alternatives: ["A", "B", "C", "D"]
                    .iter()
                    .enumerate()
                    .map(|(i, l)| Alternative {
                        id: number * 10 + i as i64,
                        question_id: number + 100,
                        letter: l.to_string(),
                        content: String::new(),
                        is_correct: letter == Some(*l),
                    })
                    .collect(),
                indicators: Vec::new(),
            })
            .collect();

        Assessment {
            id: 1,
            label: "Prueba".to_string(),
            matrix: SpecMatrix {
                id: 1,
                name: "Matriz".to_string(),
                total_questions: correct.len() as i64,
            },
            questions,
        }
    }

    fn row(key: &str, number: i64, letter: &str) -> AnswerRow {
        AnswerRow {
            student_key: key.to_string(),
            given_name: "Ana".to_string(),
            family_name: "Perez".to_string(),
            question_number: number,
            chosen_letter: letter.to_string(),
        }
    }

    #[test]
    fn test_scores_one_point_per_correct_answer() {
        let assessment = keyed_assessment(&[(1, Some("A")), (2, Some("B")), (3, Some("C"))]);
        let key = AnswerKey::build(&assessment);
        let threshold = PassThreshold::new(60.0).unwrap();

        let rows = vec![row("1", 1, "A"), row("1", 2, "B"), row("1", 3, "D")];
        let students = score_sheet(&rows, &key, threshold);

        assert_eq!(students.len(), 1);
        let student = &students[0];
        assert_eq!(student.total_points, 2);
        assert_eq!(student.max_points, 3);
        assert!((student.percentage - 66.666).abs() < 0.01);
        assert_eq!(student.outcomes.len(), 3);
        assert!(!student.outcomes[2].is_correct);
    }

    #[test]
    fn test_correctness_is_case_insensitive() {
        let assessment = keyed_assessment(&[(1, Some("A"))]);
        let key = AnswerKey::build(&assessment);
        let threshold = PassThreshold::new(60.0).unwrap();

        let students = score_sheet(&[row("1", 1, "a")], &key, threshold);
        assert_eq!(students[0].total_points, 1);
    }

    #[test]
    fn test_groups_by_student_in_first_seen_order() {
        let assessment = keyed_assessment(&[(1, Some("A"))]);
        let key = AnswerKey::build(&assessment);
        let threshold = PassThreshold::new(60.0).unwrap();

        let rows = vec![row("2", 1, "A"), row("1", 1, "B")];
        let students = score_sheet(&rows, &key, threshold);

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].student_key, "2");
        assert_eq!(students[1].student_key, "1");
    }

    #[test]
    fn test_full_and_zero_marks_at_default_threshold() {
        // Question 1 keyed A, Ana answers A, Luis answers B.
        // Grades 7.0 and 1.0 at exigencia 60.
        let assessment = keyed_assessment(&[(1, Some("A"))]);
        let key = AnswerKey::build(&assessment);
        let threshold = PassThreshold::new(60.0).unwrap();

        let rows = vec![row("1", 1, "A"), row("2", 1, "B")];
        let students = score_sheet(&rows, &key, threshold);

        assert_eq!(students[0].percentage, 100.0);
        assert_eq!(students[0].grade, 7.0);
        assert_eq!(students[1].percentage, 0.0);
        assert_eq!(students[1].grade, 1.0);
    }

    #[test]
    fn test_unkeyed_questions_leave_maximum_at_zero() {
        // Question 2 exists but has no correct alternative marked.
        let assessment = keyed_assessment(&[(1, Some("A")), (2, None)]);
        let key = AnswerKey::build(&assessment);
        let threshold = PassThreshold::new(60.0).unwrap();

        let students = score_sheet(&[row("1", 2, "A")], &key, threshold);

        assert_eq!(students.len(), 1);
        assert_eq!(students[0].max_points, 0);
        assert_eq!(students[0].percentage, 0.0);
        assert_eq!(students[0].grade, 1.0);
        assert!(students[0].outcomes.is_empty());
    }
}
