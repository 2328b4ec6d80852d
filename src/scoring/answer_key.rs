// src/scoring/answer_key.rs

use std::collections::HashMap;

use crate::models::assessment::Assessment;

/// Keyed entry for one question: its database id and correct letter.
#[derive(Debug, Clone)]
pub struct KeyedQuestion {
    pub question_id: i64,
    pub correct_letter: String,
}

/// Read-only view of an assessment's keyed questions, indexed by sequence
/// number. Built once per scoring run.
///
/// Questions without a correct alternative are left out: answers to them
/// are tolerated but score nothing, which keeps partially-keyed uploads
/// from failing the whole batch.
#[derive(Debug, Default)]
pub struct AnswerKey {
    entries: HashMap<i64, KeyedQuestion>,
}

impl AnswerKey {
    pub fn build(assessment: &Assessment) -> Self {
        let entries = assessment
            .questions
            .iter()
            .filter_map(|question| {
                question.correct_alternative().map(|alt| {
                    (
                        question.number,
                        KeyedQuestion {
                            question_id: question.id,
                            correct_letter: alt.letter.to_uppercase(),
                        },
                    )
                })
            })
            .collect();

        AnswerKey { entries }
    }

    pub fn lookup(&self, question_number: i64) -> Option<&KeyedQuestion> {
        self.entries.get(&question_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Alternative, Question, SpecMatrix};

    fn question(id: i64, number: i64, correct: Option<&str>) -> Question {
        let mut alternatives = Vec::new();
        for (i, letter) in ["A", "B", "C"].iter().enumerate() {
            alternatives.push(Alternative {
                id: id * 10 + i as i64,
                question_id: id,
                letter: letter.to_string(),
                content: String::new(),
                is_correct: correct.is_some_and(|c| c.eq_ignore_ascii_case(letter)),
            });
        }
        Question {
            id,
            number,
            content: String::new(),
            alternatives,
            indicators: Vec::new(),
        }
    }

    fn assessment(questions: Vec<Question>) -> Assessment {
        Assessment {
            id: 1,
            label: "Prueba".to_string(),
            matrix: SpecMatrix {
                id: 1,
                name: "Matriz".to_string(),
                total_questions: questions.len() as i64,
            },
            questions,
        }
    }

    #[test]
    fn test_key_indexes_by_sequence_number() {
        let a = assessment(vec![question(11, 1, Some("A")), question(12, 2, Some("c"))]);
        let key = AnswerKey::build(&a);

        assert_eq!(key.len(), 2);
        assert_eq!(key.lookup(1).unwrap().question_id, 11);
        // Letters are normalized to upper case.
        assert_eq!(key.lookup(2).unwrap().correct_letter, "C");
    }

    #[test]
    fn test_unkeyed_questions_are_excluded() {
        let a = assessment(vec![question(11, 1, Some("A")), question(12, 2, None)]);
        let key = AnswerKey::build(&a);

        assert_eq!(key.len(), 1);
        assert!(key.lookup(2).is_none());
    }
}
