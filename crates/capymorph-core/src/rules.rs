//! Morphological rule engine.
//!
//! Every rule takes a [`WordForm`] and returns a new one with exactly one
//! extra trailing morpheme. Irregular tables are consulted before any
//! regular spelling rule fires.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::lexicon::classify;
use crate::model::{features, Category, Features, Morpheme, MorphType, WordForm};

static IRREGULAR_PAST: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("run", "ran"),
        ("eat", "ate"),
        ("drink", "drank"),
        ("sleep", "slept"),
        ("teach", "taught"),
        ("think", "thought"),
    ])
});

static IRREGULAR_PLURAL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("child", "children")]));

const SIBILANT_ENDINGS: [&str; 5] = ["s", "x", "z", "ch", "sh"];

/// Irregular past form of `verb`, if it has one.
pub fn irregular_past(verb: &str) -> Option<&'static str> {
    IRREGULAR_PAST.get(verb).copied()
}

/// Irregular plural form of `noun`, if it has one.
pub fn irregular_plural(noun: &str) -> Option<&'static str> {
    IRREGULAR_PLURAL.get(noun).copied()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c)
}

/// Whether a stem ends in `s`, `x`, `z`, `ch` or `sh`.
pub fn is_sibilant_final(stem: &str) -> bool {
    SIBILANT_ENDINGS.iter().any(|end| stem.ends_with(end))
}

/// `city` -> `citi`, `happy` -> `happi`; `None` for vowel+y or no final y.
fn respell_consonant_y(stem: &str) -> Option<String> {
    let mut tail = stem.chars().rev();
    if tail.next() != Some('y') {
        return None;
    }
    match tail.next() {
        Some(prev) if is_consonant(prev) => Some(format!("{}i", &stem[..stem.len() - 1])),
        _ => None,
    }
}

fn vowel_groups(stem: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in stem.chars() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    groups
}

/// Final consonant to double for monosyllabic CVC stems (`stop` -> `p`).
fn doubled_consonant(stem: &str) -> Option<char> {
    let chars: Vec<char> = stem.chars().collect();
    let [.., prev, mid, last] = chars.as_slice() else {
        return None;
    };
    let cvc = is_consonant(*prev) && is_vowel(*mid) && is_consonant(*last);
    (cvc && !matches!(*last, 'w' | 'x' | 'y') && vowel_groups(stem) == 1).then_some(*last)
}

/// Wrap a raw word as a single free root.
pub fn base_form(word: &str) -> WordForm {
    WordForm {
        surface: word.to_string(),
        base: word.to_string(),
        category: classify(word),
        features: Features::new(),
        morphemes: vec![Morpheme::root(word)],
    }
}

/// Plural inflection: irregular table, then `-es` / `y→ies` / `-s`.
pub fn pluralize(noun: &WordForm) -> WordForm {
    if let Some(irregular) = irregular_plural(&noun.surface) {
        let affix = Morpheme::affix(
            "PL",
            MorphType::Inflectional,
            features(&[("number", "plural"), ("allomorph", "irregular")]),
        );
        return noun.extend(irregular, noun.category, &[("number", "plural")], affix);
    }

    let (stem, suffix) = if is_sibilant_final(&noun.surface) {
        (noun.surface.clone(), "es")
    } else if let Some(stem) = respell_consonant_y(&noun.surface) {
        (stem, "es")
    } else {
        (noun.surface.clone(), "s")
    };

    let affix = Morpheme::affix(
        suffix,
        MorphType::Inflectional,
        features(&[("number", "plural"), ("allomorph", suffix)]),
    );
    noun.extend(
        format!("{stem}{suffix}"),
        noun.category,
        &[("number", "plural")],
        affix,
    )
}

/// Past tense inflection: irregular table, then `-d` / `y→ied` / CVC doubling / `-ed`.
pub fn past_tense(verb: &WordForm) -> WordForm {
    if let Some(irregular) = irregular_past(&verb.surface) {
        let affix = Morpheme::affix(
            "PST",
            MorphType::Inflectional,
            features(&[("tense", "past"), ("allomorph", "irregular")]),
        );
        return verb.extend(irregular, verb.category, &[("tense", "past")], affix);
    }

    let base = verb.surface.as_str();
    let (stem, suffix) = if base.ends_with('e') {
        (base.to_string(), "d")
    } else if let Some(stem) = respell_consonant_y(base) {
        (stem, "ed")
    } else if let Some(c) = doubled_consonant(base) {
        (format!("{base}{c}"), "ed")
    } else {
        (base.to_string(), "ed")
    };

    let affix = Morpheme::affix(
        suffix,
        MorphType::Inflectional,
        features(&[("tense", "past"), ("allomorph", suffix)]),
    );
    verb.extend(
        format!("{stem}{suffix}"),
        verb.category,
        &[("tense", "past")],
        affix,
    )
}

/// Agent noun derivation: `-er`, or `-r` after a final `e`.
pub fn derive_er(verb: &WordForm) -> WordForm {
    let suffix = if verb.surface.ends_with('e') { "r" } else { "er" };
    let affix = Morpheme::affix(
        suffix,
        MorphType::Derivational,
        features(&[("derivation", "verb->noun")]),
    );
    verb.extend(
        format!("{}{suffix}", verb.surface),
        Category::Noun,
        &[("derived", "agent")],
        affix,
    )
}

/// State noun derivation with `-ness`, respelling consonant+y as `i`.
pub fn derive_ness(adjective: &WordForm) -> WordForm {
    let stem = respell_consonant_y(&adjective.surface).unwrap_or_else(|| adjective.surface.clone());
    adjective.extend(
        format!("{stem}ness"),
        Category::Noun,
        &[("derived", "state")],
        ness_affix(),
    )
}

/// Attach `-ness` with no selection check and no respelling.
///
/// Used to build deliberately ill-formed words such as `runness`.
pub fn attach_ness_unchecked(word: &WordForm) -> WordForm {
    word.extend(
        format!("{}ness", word.surface),
        Category::Noun,
        &[],
        ness_affix(),
    )
}

fn ness_affix() -> Morpheme {
    Morpheme::affix(
        "ness",
        MorphType::Derivational,
        features(&[("derivation", "adj->noun")]),
    )
}
