//! Generation error types.
//!
//! These error types represent the ways a generation run can fail before it
//! hands any records to a sink. Defined as a typed enum so the orchestrator
//! can tell a skippable family failure from a fatal one without string
//! matching.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Category, QuestionFamily};

/// Errors that can occur while loading a word bank or generating questions.
#[derive(Debug, Error)]
pub enum MorphError {
    /// The word bank could not be opened or read.
    #[error("word bank unavailable: {}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The word bank was readable but held no usable words.
    #[error("word bank contains no usable words")]
    NoData,

    /// A family needed words the lexicon does not have.
    #[error("insufficient lexicon: no {category} words satisfy {requirement}")]
    InsufficientLexicon {
        category: Category,
        requirement: String,
    },

    /// The top-up family stopped producing questions before the minimum total was reached.
    #[error("top-up family '{family}' produced no question; minimum batch size cannot be met")]
    TopUpStalled { family: QuestionFamily },
}

impl MorphError {
    pub(crate) fn insufficient(category: Category, requirement: impl Into<String>) -> Self {
        MorphError::InsufficientLexicon {
            category,
            requirement: requirement.into(),
        }
    }

    /// Returns `true` if this error only sinks a single family invocation.
    ///
    /// The orchestrator skips such slots instead of aborting the run.
    pub fn is_skippable(&self) -> bool {
        matches!(self, MorphError::InsufficientLexicon { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_lexicon_is_skippable() {
        let err = MorphError::insufficient(Category::Adjective, "any word");
        assert!(err.is_skippable());
        assert_eq!(
            err.to_string(),
            "insufficient lexicon: no adjective words satisfy any word"
        );
        assert!(!MorphError::NoData.is_skippable());
    }

    #[test]
    fn resource_unavailable_names_the_path() {
        let err = MorphError::ResourceUnavailable {
            path: PathBuf::from("missing/wordbank.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing/wordbank.txt"));
        assert!(!err.is_skippable());
    }
}
