//! End-to-end generation tests over whole batches.
//!
//! These load word banks from disk, generate full batches, and check the
//! structural guarantees every question must satisfy.

use std::collections::HashSet;

use capymorph_core::audit::audit_batch;
use capymorph_core::batch::{BatchConfig, BatchGenerator, NoopReporter, DEFAULT_MIN_TOTAL};
use capymorph_core::model::{QuestionFamily, QuestionType};
use capymorph_core::sink::{MemorySink, QuestionSink};
use capymorph_core::wordbank::load_word_bank;
use capymorph_core::{Lexicon, MorphError};

fn bank_file(words: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordbank.txt");
    std::fs::write(&path, words.join("\n")).unwrap();
    (dir, path)
}

fn lexicon_from(words: &[&str]) -> Lexicon {
    let (_dir, path) = bank_file(words);
    Lexicon::new(load_word_bank(&path).unwrap())
}

const RICH_BANK: &[&str] = &[
    "walk", "run", "jump", "stop", "eat", "teach", "play", "carry", "drive", "happy", "calm",
    "busy", "kind", "dry", "cat", "fox", "bus", "dog", "child", "city", "tree", "bird", "box",
    "capybara",
];

#[test]
fn small_bank_scenario() {
    let lex = lexicon_from(&["run", "happy", "cat", "fox", "child"]);
    let batch = BatchGenerator::new(&lex, BatchConfig::default())
        .run(2024, &NoopReporter)
        .unwrap();

    assert!(batch.questions.len() >= DEFAULT_MIN_TOTAL);
    assert!(batch.questions.iter().any(|q| {
        q.family == QuestionFamily::WellFormedness && q.correct_answer == "runness"
    }));
    assert!(batch.questions.iter().any(|q| {
        q.family == QuestionFamily::Allomorphy && q.correct_answer == "foxes"
    }));
    assert!(audit_batch(&batch.questions).is_empty());
}

#[test]
fn every_question_is_well_formed_across_seeds() {
    let lex = lexicon_from(RICH_BANK);
    for seed in 0..8 {
        let batch = BatchGenerator::new(&lex, BatchConfig::default())
            .run(seed, &NoopReporter)
            .unwrap();

        for q in &batch.questions {
            assert!(q.choices.contains(&q.correct_answer), "question {}", q.id);
            match q.question_type {
                QuestionType::TrueFalse => {
                    assert_eq!(q.choices, vec!["True", "False"]);
                    assert_eq!(q.violated_rule.len(), 1);
                }
                QuestionType::MultipleChoice => {
                    assert_eq!(q.distractors.len(), 3);
                    let options: HashSet<&str> = std::iter::once(q.correct_answer.as_str())
                        .chain(q.distractors.iter().map(String::as_str))
                        .collect();
                    assert_eq!(options.len(), 4, "question {} repeats an option", q.id);
                    assert_eq!(q.violated_rule.len(), 3);
                }
            }
        }
        assert!(audit_batch(&batch.questions).is_empty(), "seed {seed}");
    }
}

#[test]
fn rich_bank_fills_every_family_without_top_up() {
    let lex = lexicon_from(RICH_BANK);
    let batch = BatchGenerator::new(&lex, BatchConfig::default())
        .run(17, &NoopReporter)
        .unwrap();

    assert_eq!(batch.questions.len(), 8 * 32);
    for family in QuestionFamily::ALL {
        let tally = batch.tallies[&family];
        assert_eq!(tally.generated, 32, "{family}");
        assert_eq!(tally.skipped, 0, "{family}");
        assert_eq!(tally.topped_up, 0, "{family}");
    }
    assert_eq!(batch.skipped(), 0);
}

#[test]
fn bank_without_words_aborts_with_no_data() {
    let lex = lexicon_from(&["", "   "]);
    let err = BatchGenerator::new(&lex, BatchConfig::default())
        .run(1, &NoopReporter)
        .unwrap_err();
    assert!(matches!(err, MorphError::NoData));
}

#[tokio::test]
async fn sink_receives_the_whole_batch() {
    let lex = lexicon_from(RICH_BANK);
    let batch = BatchGenerator::new(&lex, BatchConfig::default())
        .run(3, &NoopReporter)
        .unwrap();

    let sink = MemorySink::new();
    let outcome = sink.insert_many(&batch.questions).await.unwrap();
    assert_eq!(outcome.accepted, batch.questions.len());
    assert_eq!(sink.stored(), batch.questions);
}
