//! Batch orchestrator.
//!
//! Runs every configured family round-robin for a fixed quota, then tops the
//! batch up with one designated family until a minimum size is reached.
//! Assigns ids in insertion order and shuffles multiple-choice options.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MorphError;
use crate::families::FamilyGenerator;
use crate::lexicon::Lexicon;
use crate::model::{QuestionDoc, QuestionDraft, QuestionFamily, QuestionType, TRUE_FALSE_CHOICES};

pub const DEFAULT_PER_FAMILY_QUOTA: usize = 32;
pub const DEFAULT_MIN_TOTAL: usize = 256;

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Round-robin passes over `families`.
    pub per_family_quota: usize,
    /// Minimum number of questions in the finished batch.
    pub min_total: usize,
    /// Family repeated after the main pass to reach `min_total`.
    pub top_up_family: QuestionFamily,
    /// Families in round-robin order.
    pub families: Vec<QuestionFamily>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            per_family_quota: DEFAULT_PER_FAMILY_QUOTA,
            min_total: DEFAULT_MIN_TOTAL,
            top_up_family: QuestionFamily::InflectionVsDerivation,
            families: QuestionFamily::ALL.to_vec(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_question(&self, question: &QuestionDoc);
    fn on_family_skipped(&self, family: QuestionFamily, reason: &str);
    fn on_batch_complete(&self, total: usize, skipped: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_question(&self, _: &QuestionDoc) {}
    fn on_family_skipped(&self, _: QuestionFamily, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// Per-family counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyTally {
    /// Produced during the round-robin pass.
    pub generated: usize,
    /// Round-robin slots that produced nothing.
    pub skipped: usize,
    /// Produced by the top-up pass.
    pub topped_up: usize,
}

impl FamilyTally {
    pub fn total(&self) -> usize {
        self.generated + self.topped_up
    }
}

/// A finished batch, ready for a sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Seed of the run's random source, when it was seeded from a number.
    pub seed: Option<u64>,
    pub questions: Vec<QuestionDoc>,
    pub tallies: BTreeMap<QuestionFamily, FamilyTally>,
    pub duration_ms: u64,
}

impl Batch {
    pub fn skipped(&self) -> usize {
        self.tallies.values().map(|t| t.skipped).sum()
    }
}

/// A seed derived from the wall clock.
pub fn time_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map(|n| n as u64)
        .unwrap_or_else(|| now.timestamp_micros() as u64)
}

/// The batch generator.
pub struct BatchGenerator<'a> {
    lexicon: &'a Lexicon,
    config: BatchConfig,
}

impl<'a> BatchGenerator<'a> {
    pub fn new(lexicon: &'a Lexicon, config: BatchConfig) -> Self {
        Self { lexicon, config }
    }

    /// Generate a batch from a seeded random source.
    pub fn run(&self, seed: u64, progress: &dyn ProgressReporter) -> Result<Batch, MorphError> {
        tracing::info!(seed, "seeding generation run");
        let mut rng = StdRng::seed_from_u64(seed);
        let mut batch = self.run_with_rng(&mut rng, progress)?;
        batch.seed = Some(seed);
        Ok(batch)
    }

    /// Generate a batch drawing all randomness from `rng`.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        progress: &dyn ProgressReporter,
    ) -> Result<Batch, MorphError> {
        if self.lexicon.is_empty() {
            return Err(MorphError::NoData);
        }

        let start = Instant::now();
        let generator = FamilyGenerator::new(self.lexicon);
        let mut questions = Vec::new();
        let mut tallies: BTreeMap<QuestionFamily, FamilyTally> = self
            .config
            .families
            .iter()
            .chain(std::iter::once(&self.config.top_up_family))
            .map(|f| (*f, FamilyTally::default()))
            .collect();

        tracing::info!(
            words = self.lexicon.words().len(),
            families = self.config.families.len(),
            quota = self.config.per_family_quota,
            min_total = self.config.min_total,
            "generating question batch"
        );

        for _ in 0..self.config.per_family_quota {
            for &family in &self.config.families {
                let tally = tallies.entry(family).or_default();
                match generator.generate(family, rng) {
                    Ok(Some(draft)) => {
                        push_question(&mut questions, draft, rng, progress);
                        tally.generated += 1;
                    }
                    Ok(None) => {
                        tally.skipped += 1;
                        progress.on_family_skipped(family, "nothing to ask with this word bank");
                    }
                    Err(e) if e.is_skippable() => {
                        tracing::warn!("skipping {family} slot: {e}");
                        tally.skipped += 1;
                        progress.on_family_skipped(family, &e.to_string());
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        let top_up = self.config.top_up_family;
        while questions.len() < self.config.min_total {
            match generator.generate(top_up, rng) {
                Ok(Some(draft)) => {
                    push_question(&mut questions, draft, rng, progress);
                    tallies.entry(top_up).or_default().topped_up += 1;
                }
                Ok(None) => return Err(MorphError::TopUpStalled { family: top_up }),
                Err(e) if e.is_skippable() => {
                    tracing::error!("top-up with {top_up} failed: {e}");
                    return Err(MorphError::TopUpStalled { family: top_up });
                }
                Err(e) => return Err(e),
            }
        }

        let elapsed = start.elapsed();
        let skipped = tallies.values().map(|t| t.skipped).sum();
        progress.on_batch_complete(questions.len(), skipped, elapsed);
        tracing::info!(
            total = questions.len(),
            skipped,
            "batch generated in {}ms",
            elapsed.as_millis()
        );

        Ok(Batch {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            seed: None,
            questions,
            tallies,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

fn push_question<R: Rng + ?Sized>(
    questions: &mut Vec<QuestionDoc>,
    draft: QuestionDraft,
    rng: &mut R,
    progress: &dyn ProgressReporter,
) {
    let id = questions.len() as u32 + 1;
    let question = assemble(draft, id, rng);
    tracing::debug!(id, family = %question.family, "{}", question.question_text);
    progress.on_question(&question);
    questions.push(question);
}

/// Turn a draft into a finished record with `id` and final choice order.
///
/// Multiple-choice options are shuffled with a fresh generator seeded from
/// `rng`; the stored correct answer is never changed.
pub fn assemble<R: Rng + ?Sized>(draft: QuestionDraft, id: u32, rng: &mut R) -> QuestionDoc {
    let question_type = draft.question_type();
    let choices = match question_type {
        QuestionType::TrueFalse => TRUE_FALSE_CHOICES.iter().map(|c| c.to_string()).collect(),
        QuestionType::MultipleChoice => {
            let mut choices = Vec::with_capacity(draft.distractors.len() + 1);
            choices.push(draft.correct_answer.clone());
            choices.extend(draft.distractors.iter().cloned());
            let mut shuffler = StdRng::seed_from_u64(rng.gen());
            choices.shuffle(&mut shuffler);
            choices
        }
    };

    QuestionDoc {
        id,
        family: draft.family,
        difficulty: draft.family.difficulty(),
        text: draft.question_text.clone(),
        answer: draft.correct_answer.clone(),
        question_text: draft.question_text,
        question_type,
        correct_answer: draft.correct_answer,
        choices,
        distractors: draft.distractors,
        violated_rule: draft.violated_rule,
        answer_violation: draft.answer_violation,
        base_word: draft.base_word,
        morphemes_used: draft.morphemes_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon(words: &[&str]) -> Lexicon {
        Lexicon::new(words.iter().map(|w| w.to_string()).collect())
    }

    fn draft(family: QuestionFamily, correct: &str, distractors: &[&str]) -> QuestionDraft {
        QuestionDraft {
            family,
            question_text: "q?".into(),
            correct_answer: correct.into(),
            distractors: distractors.iter().map(|d| d.to_string()).collect(),
            violated_rule: distractors.iter().map(|_| "tag".to_string()).collect(),
            answer_violation: None,
            base_word: "cat".into(),
            morphemes_used: vec!["cat".into()],
        }
    }

    #[test]
    fn assemble_true_false_has_fixed_choices() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut d = draft(QuestionFamily::CategoryChange, "False", &[]);
        d.violated_rule = vec!["incorrect_category_change_claim".into()];
        let q = assemble(d, 7, &mut rng);
        assert_eq!(q.id, 7);
        assert_eq!(q.choices, vec!["True", "False"]);
        assert_eq!(q.correct_answer, "False");
        assert_eq!(q.answer, "False");
        assert_eq!(q.question_type, QuestionType::TrueFalse);
    }

    #[test]
    fn assemble_multiple_choice_keeps_answer_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen_first = std::collections::HashSet::new();
        for id in 1..=40 {
            let q = assemble(
                draft(QuestionFamily::Allomorphy, "foxes", &["cats", "dogs", "runners"]),
                id,
                &mut rng,
            );
            assert_eq!(q.correct_answer, "foxes");
            assert!(q.choices.contains(&q.correct_answer));
            let mut sorted = q.choices.clone();
            sorted.sort();
            assert_eq!(sorted, vec!["cats", "dogs", "foxes", "runners"]);
            seen_first.insert(q.choices[0].clone());
        }
        assert!(seen_first.len() > 1, "choices were never reordered");
    }

    #[test]
    fn empty_lexicon_is_no_data() {
        let lex = lexicon(&[]);
        let gen = BatchGenerator::new(&lex, BatchConfig::default());
        assert!(matches!(gen.run(1, &NoopReporter), Err(MorphError::NoData)));
    }

    #[test]
    fn small_bank_is_topped_up_to_the_minimum() {
        let lex = lexicon(&["run", "happy", "cat", "fox", "child"]);
        let gen = BatchGenerator::new(&lex, BatchConfig::default());
        let batch = gen.run(42, &NoopReporter).unwrap();

        assert_eq!(batch.questions.len(), DEFAULT_MIN_TOTAL);
        assert_eq!(batch.seed, Some(42));
        let irregular = batch.tallies[&QuestionFamily::Irregularity];
        assert_eq!(irregular.generated, 0);
        assert_eq!(irregular.skipped, DEFAULT_PER_FAMILY_QUOTA);
        let top_up = batch.tallies[&QuestionFamily::InflectionVsDerivation];
        assert_eq!(top_up.generated, DEFAULT_PER_FAMILY_QUOTA);
        assert_eq!(top_up.topped_up, DEFAULT_MIN_TOTAL - 7 * DEFAULT_PER_FAMILY_QUOTA);
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let lex = lexicon(&["run", "walk", "jump", "stop", "happy", "cat", "fox", "dog"]);
        let config = BatchConfig {
            per_family_quota: 2,
            min_total: 0,
            ..Default::default()
        };
        let batch = BatchGenerator::new(&lex, config).run(5, &NoopReporter).unwrap();
        assert_eq!(batch.questions.len(), 16);
        for (i, q) in batch.questions.iter().enumerate() {
            assert_eq!(q.id as usize, i + 1);
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let lex = lexicon(&["run", "walk", "jump", "stop", "happy", "calm", "cat", "fox", "dog"]);
        let gen = BatchGenerator::new(&lex, BatchConfig::default());
        let a = gen.run(99, &NoopReporter).unwrap();
        let b = gen.run(99, &NoopReporter).unwrap();
        assert_eq!(a.questions, b.questions);
    }

    #[test]
    fn stalled_top_up_fails_instead_of_looping() {
        // No adjectives: the top-up family can never build its -ness distractor.
        let lex = lexicon(&["run", "cat", "fox"]);
        let gen = BatchGenerator::new(&lex, BatchConfig::default());
        let err = gen.run(1, &NoopReporter).unwrap_err();
        assert!(matches!(
            err,
            MorphError::TopUpStalled {
                family: QuestionFamily::InflectionVsDerivation
            }
        ));
    }

    #[test]
    fn top_up_family_is_configurable() {
        let lex = lexicon(&["run", "happy", "cat", "fox", "child"]);
        let config = BatchConfig {
            per_family_quota: 1,
            min_total: 20,
            top_up_family: QuestionFamily::MorphemeCounting,
            ..Default::default()
        };
        let batch = BatchGenerator::new(&lex, config).run(3, &NoopReporter).unwrap();
        assert_eq!(batch.questions.len(), 20);
        assert_eq!(
            batch.tallies[&QuestionFamily::MorphemeCounting].topped_up,
            20 - 7
        );
    }
}
