//! Batch auditing.
//!
//! Re-checks the structural guarantees of a finished batch, e.g. one read
//! back from a sink file.

use std::collections::HashSet;

use crate::families::options_distinct;
use crate::model::{QuestionDoc, QuestionType, TRUE_FALSE_CHOICES};

/// A problem found in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditWarning {
    /// The offending question, if the warning is about one question.
    pub question_id: Option<u32>,
    pub message: String,
}

/// Audit a batch and return every problem found.
pub fn audit_batch(questions: &[QuestionDoc]) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    if questions.is_empty() {
        warnings.push(AuditWarning {
            question_id: None,
            message: "batch contains no questions".into(),
        });
    }

    let mut ids = HashSet::new();
    for (i, q) in questions.iter().enumerate() {
        let expected = i as u32 + 1;
        if q.id != expected {
            warnings.push(AuditWarning {
                question_id: Some(q.id),
                message: format!("expected id {expected} at position {}, found {}", i + 1, q.id),
            });
        }
        if !ids.insert(q.id) {
            warnings.push(AuditWarning {
                question_id: Some(q.id),
                message: "duplicate id".into(),
            });
        }
        warnings.extend(
            audit_question(q)
                .into_iter()
                .map(|message| AuditWarning {
                    question_id: Some(q.id),
                    message,
                }),
        );
    }

    warnings
}

/// Problems with a single question, as messages.
pub fn audit_question(q: &QuestionDoc) -> Vec<String> {
    let mut problems = Vec::new();

    if !q.choices.contains(&q.correct_answer) {
        problems.push(format!(
            "correct answer \"{}\" is not among the choices",
            q.correct_answer
        ));
    }
    if q.question_type != q.family.question_type() {
        problems.push(format!(
            "{} family produced a {} question",
            q.family, q.question_type
        ));
    }
    if q.difficulty != q.family.difficulty() {
        problems.push(format!(
            "difficulty {} does not match the {} family",
            q.difficulty, q.family
        ));
    }
    if q.text != q.question_text || q.answer != q.correct_answer {
        problems.push("legacy text/answer fields disagree with question_text/correct_answer".into());
    }
    if q.morphemes_used.is_empty() {
        problems.push("no morphemes recorded".into());
    }

    match q.question_type {
        QuestionType::TrueFalse => {
            if q.choices != TRUE_FALSE_CHOICES {
                problems.push(format!("true/false choices are {:?}", q.choices));
            }
            if !q.distractors.is_empty() {
                problems.push("true/false question has distractors".into());
            }
            if q.violated_rule.len() != 1 {
                problems.push(format!(
                    "true/false question has {} violation tags, expected 1",
                    q.violated_rule.len()
                ));
            }
        }
        QuestionType::MultipleChoice => {
            if q.distractors.len() != 3 {
                problems.push(format!(
                    "expected 3 distractors, found {}",
                    q.distractors.len()
                ));
            }
            if !options_distinct(&q.correct_answer, &q.distractors) {
                problems.push("options are not pairwise distinct".into());
            }
            let mut expected: Vec<&str> = std::iter::once(q.correct_answer.as_str())
                .chain(q.distractors.iter().map(String::as_str))
                .collect();
            let mut actual: Vec<&str> = q.choices.iter().map(String::as_str).collect();
            expected.sort_unstable();
            actual.sort_unstable();
            if expected != actual {
                problems.push("choices are not a permutation of answer and distractors".into());
            }
            if q.violated_rule.len() != q.distractors.len() {
                problems.push(format!(
                    "{} violation tags for {} distractors",
                    q.violated_rule.len(),
                    q.distractors.len()
                ));
            }
        }
    }

    problems
}
