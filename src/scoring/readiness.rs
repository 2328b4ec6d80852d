// src/scoring/readiness.rs

use serde::Serialize;

use crate::models::assessment::{Assessment, IndicatorKind};

/// How far an assessment's authoring is from being gradable.
///
/// Advisory only: the classifier never blocks an upload, it is surfaced to
/// operators before they attempt to score a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessState {
    Draft,
    WrongQuestionCount,
    MissingAnswerKey,
    MissingContentIndicator,
    MissingSkillIndicator,
    Complete,
}

impl ReadinessState {
    /// Evaluates the readiness checks in fixed precedence order;
    /// the first failing check wins.
    pub fn classify(assessment: &Assessment) -> Self {
        let questions = &assessment.questions;

        // Nothing authored yet: no scoring is attempted on drafts.
        if questions.is_empty() {
            return ReadinessState::Draft;
        }

        if questions.len() as i64 != assessment.matrix.total_questions {
            return ReadinessState::WrongQuestionCount;
        }

        if questions.iter().any(|q| q.correct_alternative().is_none()) {
            return ReadinessState::MissingAnswerKey;
        }

        if questions
            .iter()
            .any(|q| !q.has_indicator(IndicatorKind::Content))
        {
            return ReadinessState::MissingContentIndicator;
        }

        // Skill coverage is only required once any question opts into
        // skill tagging; untagged assessments pass this check entirely.
        let skill_tagging_in_use = questions.iter().any(|q| q.has_indicator(IndicatorKind::Skill));
        if skill_tagging_in_use
            && questions
                .iter()
                .any(|q| !q.has_indicator(IndicatorKind::Skill))
        {
            return ReadinessState::MissingSkillIndicator;
        }

        ReadinessState::Complete
    }

    /// Operator-facing label.
    pub fn description(&self) -> &'static str {
        match self {
            ReadinessState::Draft => "Borrador",
            ReadinessState::WrongQuestionCount => "Cantidad incorrecta",
            ReadinessState::MissingAnswerKey => "Sin respuestas",
            ReadinessState::MissingContentIndicator | ReadinessState::MissingSkillIndicator => {
                "Sin indicadores"
            }
            ReadinessState::Complete => "Completa",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Alternative, Indicator, Question, SpecMatrix};

    struct QuestionSpec {
        keyed: bool,
        content_indicator: bool,
        skill_indicator: bool,
    }

    fn question(number: i64, spec: &QuestionSpec) -> Question {
        let mut indicators = Vec::new();
        if spec.content_indicator {
            indicators.push(Indicator {
                id: number * 10,
                kind: IndicatorKind::Content,
                description: String::new(),
                target_questions: 0,
            });
        }
        if spec.skill_indicator {
            indicators.push(Indicator {
                id: number * 10 + 1,
                kind: IndicatorKind::Skill,
                description: String::new(),
                target_questions: 0,
            });
        }
        Question {
            id: number,
            number,
            content: String::new(),
            alternatives: vec![Alternative {
                id: number * 100,
                question_id: number,
                letter: "A".to_string(),
                content: String::new(),
                is_correct: spec.keyed,
            }],
            indicators,
        }
    }

    fn assessment(total_questions: i64, specs: &[QuestionSpec]) -> Assessment {
        Assessment {
            id: 1,
            label: "Prueba".to_string(),
            matrix: SpecMatrix {
                id: 1,
                name: "Matriz".to_string(),
                total_questions,
            },
            questions: specs
                .iter()
                .enumerate()
                .map(|(i, spec)| question(i as i64 + 1, spec))
                .collect(),
        }
    }

    fn full(keyed: bool, content: bool, skill: bool) -> QuestionSpec {
        QuestionSpec {
            keyed,
            content_indicator: content,
            skill_indicator: skill,
        }
    }

    #[test]
    fn test_no_questions_is_a_draft() {
        let a = assessment(10, &[]);
        assert_eq!(ReadinessState::classify(&a), ReadinessState::Draft);
    }

    #[test]
    fn test_question_count_mismatch_wins_over_everything() {
        // 9 fully keyed and tagged questions against a 10-question matrix.
        let specs: Vec<_> = (0..9).map(|_| full(true, true, true)).collect();
        let a = assessment(10, &specs);
        assert_eq!(
            ReadinessState::classify(&a),
            ReadinessState::WrongQuestionCount
        );
    }

    #[test]
    fn test_unkeyed_question_beats_indicator_checks() {
        let a = assessment(2, &[full(true, false, false), full(false, false, false)]);
        assert_eq!(
            ReadinessState::classify(&a),
            ReadinessState::MissingAnswerKey
        );
    }

    #[test]
    fn test_missing_content_indicator() {
        let a = assessment(2, &[full(true, true, false), full(true, false, false)]);
        assert_eq!(
            ReadinessState::classify(&a),
            ReadinessState::MissingContentIndicator
        );
    }

    #[test]
    fn test_skill_check_only_applies_when_skill_tagging_is_in_use() {
        // No skill indicators anywhere: complete without them.
        let a = assessment(2, &[full(true, true, false), full(true, true, false)]);
        assert_eq!(ReadinessState::classify(&a), ReadinessState::Complete);

        // One question opts into skill tagging: now all must carry one.
        let b = assessment(2, &[full(true, true, true), full(true, true, false)]);
        assert_eq!(
            ReadinessState::classify(&b),
            ReadinessState::MissingSkillIndicator
        );
    }

    #[test]
    fn test_complete_with_full_skill_coverage() {
        let a = assessment(2, &[full(true, true, true), full(true, true, true)]);
        assert_eq!(ReadinessState::classify(&a), ReadinessState::Complete);
    }
}
