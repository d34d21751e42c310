//! Core data model types for capymorph.
//!
//! These are the fundamental types the whole generator uses to represent
//! morphemes, word forms, and the quiz questions built from them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grammatical features, e.g. `number: plural` or `allomorph: es`.
pub type Features = BTreeMap<String, String>;

/// Build a feature map from string pairs.
pub fn features(pairs: &[(&str, &str)]) -> Features {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Lexical category of a word form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Noun,
    Verb,
    Adjective,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Noun => write!(f, "noun"),
            Category::Verb => write!(f, "verb"),
            Category::Adjective => write!(f, "adjective"),
        }
    }
}

/// Whether a morpheme is the root or an affix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphemeRole {
    Root,
    Affix,
}

/// Morphological type of a morpheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphType {
    Free,
    Inflectional,
    Derivational,
}

/// The smallest meaningful unit of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    /// Spelling, or a placeholder such as `PL` for irregular forms.
    pub surface: String,
    pub role: MorphemeRole,
    /// Affixes are bound, roots are free.
    pub bound: bool,
    pub morph_type: MorphType,
    #[serde(default)]
    pub features: Features,
}

impl Morpheme {
    /// A free root morpheme.
    pub fn root(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            role: MorphemeRole::Root,
            bound: false,
            morph_type: MorphType::Free,
            features: Features::new(),
        }
    }

    /// A bound affix morpheme.
    pub fn affix(surface: impl Into<String>, morph_type: MorphType, features: Features) -> Self {
        Self {
            surface: surface.into(),
            role: MorphemeRole::Affix,
            bound: true,
            morph_type,
            features,
        }
    }
}

/// A word together with the morpheme history that produced it.
///
/// `morphemes` is never empty and starts with the root morpheme of `base`.
/// Rule functions never mutate a `WordForm`; they build a new one with
/// [`WordForm::extend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordForm {
    pub surface: String,
    pub base: String,
    pub category: Category,
    #[serde(default)]
    pub features: Features,
    pub morphemes: Vec<Morpheme>,
}

impl WordForm {
    /// Copy this form and append one morpheme.
    pub fn extend(
        &self,
        surface: impl Into<String>,
        category: Category,
        added: &[(&str, &str)],
        morpheme: Morpheme,
    ) -> WordForm {
        let mut feats = self.features.clone();
        feats.extend(features(added));
        let mut morphemes = self.morphemes.clone();
        morphemes.push(morpheme);
        WordForm {
            surface: surface.into(),
            base: self.base.clone(),
            category,
            features: feats,
            morphemes,
        }
    }

    pub fn morpheme_count(&self) -> usize {
        self.morphemes.len()
    }

    pub fn morpheme_surfaces(&self) -> Vec<String> {
        self.morphemes.iter().map(|m| m.surface.clone()).collect()
    }

    /// The most recently attached affix, if any.
    pub fn last_affix(&self) -> Option<&Morpheme> {
        self.morphemes
            .iter()
            .rev()
            .find(|m| m.role == MorphemeRole::Affix)
    }

    pub fn has_derivational(&self) -> bool {
        self.morphemes
            .iter()
            .any(|m| m.morph_type == MorphType::Derivational)
    }

    /// Allomorph tag of the last affix (`s`, `es`, `irregular`, ...).
    pub fn last_allomorph(&self) -> Option<&str> {
        self.last_affix()
            .and_then(|m| m.features.get("allomorph"))
            .map(String::as_str)
    }
}

/// Choices of every true/false question, in this order.
pub const TRUE_FALSE_CHOICES: [&str; 2] = ["True", "False"];

/// True/false or multiple choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "TF")]
    TrueFalse,
    #[serde(rename = "MC")]
    MultipleChoice,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::TrueFalse => write!(f, "TF"),
            QuestionType::MultipleChoice => write!(f, "MC"),
        }
    }
}

/// Difficulty label read by the game client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// The question generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionFamily {
    MorphemeProperty,
    InflectionVsDerivation,
    CategoryChange,
    FeatureEncoding,
    MorphemeCounting,
    WellFormedness,
    Allomorphy,
    Irregularity,
}

impl QuestionFamily {
    /// Every family, in round-robin order.
    pub const ALL: [QuestionFamily; 8] = [
        QuestionFamily::MorphemeProperty,
        QuestionFamily::InflectionVsDerivation,
        QuestionFamily::CategoryChange,
        QuestionFamily::FeatureEncoding,
        QuestionFamily::MorphemeCounting,
        QuestionFamily::WellFormedness,
        QuestionFamily::Allomorphy,
        QuestionFamily::Irregularity,
    ];

    pub fn difficulty(self) -> Difficulty {
        match self {
            QuestionFamily::MorphemeProperty
            | QuestionFamily::CategoryChange
            | QuestionFamily::FeatureEncoding => Difficulty::Easy,
            QuestionFamily::InflectionVsDerivation
            | QuestionFamily::MorphemeCounting
            | QuestionFamily::Allomorphy => Difficulty::Medium,
            QuestionFamily::WellFormedness | QuestionFamily::Irregularity => Difficulty::Hard,
        }
    }

    pub fn question_type(self) -> QuestionType {
        match self {
            QuestionFamily::MorphemeProperty | QuestionFamily::CategoryChange => {
                QuestionType::TrueFalse
            }
            _ => QuestionType::MultipleChoice,
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            QuestionFamily::MorphemeProperty => {
                "Is an affix bound/free, root/affix, derivational/inflectional?"
            }
            QuestionFamily::InflectionVsDerivation => {
                "Pick the word with only inflectional morphology"
            }
            QuestionFamily::CategoryChange => "Does -ness change the lexical category?",
            QuestionFamily::FeatureEncoding => "Which feature does a past-tense suffix encode?",
            QuestionFamily::MorphemeCounting => "Count the morphemes of a derived plural",
            QuestionFamily::WellFormedness => "Spot the word that breaks -ness selection",
            QuestionFamily::Allomorphy => "Pick the plural spelled with -es",
            QuestionFamily::Irregularity => "Pick the verb with an irregular past tense",
        }
    }
}

impl fmt::Display for QuestionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionFamily::MorphemeProperty => "morpheme-property",
            QuestionFamily::InflectionVsDerivation => "inflection-vs-derivation",
            QuestionFamily::CategoryChange => "category-change",
            QuestionFamily::FeatureEncoding => "feature-encoding",
            QuestionFamily::MorphemeCounting => "morpheme-counting",
            QuestionFamily::WellFormedness => "well-formedness",
            QuestionFamily::Allomorphy => "allomorphy",
            QuestionFamily::Irregularity => "irregularity",
        };
        f.write_str(name)
    }
}

impl FromStr for QuestionFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        QuestionFamily::ALL
            .into_iter()
            .find(|f| f.to_string() == wanted)
            .ok_or_else(|| format!("unknown question family: {s}"))
    }
}

/// A question as produced by a family, before batch assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub family: QuestionFamily,
    pub question_text: String,
    pub correct_answer: String,
    /// Empty for true/false questions.
    pub distractors: Vec<String>,
    /// One tag per distractor; a single slot for true/false.
    pub violated_rule: Vec<String>,
    /// Set when the correct answer is itself the rule-breaking form.
    pub answer_violation: Option<String>,
    pub base_word: String,
    pub morphemes_used: Vec<String>,
}

impl QuestionDraft {
    pub fn question_type(&self) -> QuestionType {
        self.family.question_type()
    }
}

/// A finished question record, as handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDoc {
    pub id: u32,
    pub family: QuestionFamily,
    pub difficulty: Difficulty,
    pub question_text: String,
    pub question_type: QuestionType,
    pub correct_answer: String,
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distractors: Vec<String>,
    #[serde(default)]
    pub violated_rule: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_violation: Option<String>,
    pub base_word: String,
    #[serde(default)]
    pub morphemes_used: Vec<String>,
    /// Mirror of `question_text` for the game client.
    pub text: String,
    /// Mirror of `correct_answer` for the game client.
    pub answer: String,
}
