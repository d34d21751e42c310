//! capymorph-core: morphological rule engine and quiz generator.
//!
//! This crate turns a plain word list into morphology quiz questions whose
//! answers are read off the morpheme structure the rule engine builds, and
//! hands finished batches to a persistence sink.

pub mod audit;
pub mod batch;
pub mod config;
pub mod error;
pub mod families;
pub mod lexicon;
pub mod model;
pub mod rules;
pub mod sink;
pub mod wordbank;

pub use batch::{Batch, BatchConfig, BatchGenerator};
pub use error::MorphError;
pub use lexicon::Lexicon;
pub use model::{QuestionDoc, QuestionFamily, WordForm};
