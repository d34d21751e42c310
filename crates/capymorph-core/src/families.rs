//! Question family generators.
//!
//! Each family builds word forms with the rule engine and reads the correct
//! answer off their morpheme structure. Distractors are either the correct
//! claim with one property flipped, or forms that the generating rule
//! guarantees violate the asked-about property. Every distractor carries a
//! violation tag naming that property.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MorphError;
use crate::lexicon::Lexicon;
use crate::model::{
    Category, Morpheme, MorphType, MorphemeRole, QuestionDraft, QuestionFamily, WordForm,
};
use crate::rules::{
    attach_ness_unchecked, base_form, derive_er, derive_ness, irregular_past, irregular_plural,
    is_sibilant_final, past_tense, pluralize,
};

/// Draws allowed per question while looking for pairwise distinct options.
pub const MAX_DISTINCT_ATTEMPTS: usize = 64;

pub const FLIPPED_MORPHEME_PROPERTY: &str = "flipped_morpheme_property";
pub const CONTAINS_DERIVATIONAL_AFFIX: &str = "contains_derivational_affix";
pub const INCORRECT_CATEGORY_CHANGE_CLAIM: &str = "incorrect_category_change_claim";
pub const FEATURE_MISMATCH: &str = "feature_mismatch";
pub const WRONG_MORPHEME_COUNT: &str = "wrong_morpheme_count";
pub const VIOLATES_NESS_SELECTION: &str = "violates_-ness_selection";
pub const USES_DEFAULT_PLURAL_S: &str = "uses_default_plural_-s";
pub const USES_IRREGULAR_PLURAL: &str = "uses_irregular_plural";
pub const REGULAR_PAST_ED: &str = "regular_past_(-ed)";

const FEATURE_LABELS: [&str; 6] = [
    "number: plural",
    "aspect: progressive",
    "person: 3",
    "tense: present",
    "number: singular",
    "mood: imperative",
];

/// A yes/no property of a morpheme, paired with its complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MorphemeProperty {
    Bound,
    Free,
    Root,
    Affix,
    Derivational,
    Inflectional,
}

impl MorphemeProperty {
    const ALL: [MorphemeProperty; 6] = [
        MorphemeProperty::Bound,
        MorphemeProperty::Free,
        MorphemeProperty::Root,
        MorphemeProperty::Affix,
        MorphemeProperty::Derivational,
        MorphemeProperty::Inflectional,
    ];

    fn label(self) -> &'static str {
        match self {
            MorphemeProperty::Bound => "bound",
            MorphemeProperty::Free => "free",
            MorphemeProperty::Root => "a root",
            MorphemeProperty::Affix => "an affix",
            MorphemeProperty::Derivational => "derivational",
            MorphemeProperty::Inflectional => "inflectional",
        }
    }

    fn complement(self) -> Self {
        match self {
            MorphemeProperty::Bound => MorphemeProperty::Free,
            MorphemeProperty::Free => MorphemeProperty::Bound,
            MorphemeProperty::Root => MorphemeProperty::Affix,
            MorphemeProperty::Affix => MorphemeProperty::Root,
            MorphemeProperty::Derivational => MorphemeProperty::Inflectional,
            MorphemeProperty::Inflectional => MorphemeProperty::Derivational,
        }
    }

    /// Complements hold exactly when the property does not, for any affix.
    fn holds(self, m: &Morpheme) -> bool {
        match self {
            MorphemeProperty::Bound => m.bound,
            MorphemeProperty::Free => !m.bound,
            MorphemeProperty::Root => m.role == MorphemeRole::Root,
            MorphemeProperty::Affix => m.role == MorphemeRole::Affix,
            MorphemeProperty::Derivational => m.morph_type == MorphType::Derivational,
            MorphemeProperty::Inflectional => m.morph_type == MorphType::Inflectional,
        }
    }
}

/// Generates questions from one lexicon.
pub struct FamilyGenerator<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> FamilyGenerator<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Run one family once.
    ///
    /// `Ok(None)` means the family has nothing to ask about with this
    /// lexicon (only the irregularity family does this).
    pub fn generate<R: Rng + ?Sized>(
        &self,
        family: QuestionFamily,
        rng: &mut R,
    ) -> Result<Option<QuestionDraft>, MorphError> {
        match family {
            QuestionFamily::MorphemeProperty => self.morpheme_property(rng).map(Some),
            QuestionFamily::InflectionVsDerivation => self.inflection_vs_derivation(rng).map(Some),
            QuestionFamily::CategoryChange => self.category_change(rng).map(Some),
            QuestionFamily::FeatureEncoding => self.feature_encoding(rng).map(Some),
            QuestionFamily::MorphemeCounting => self.morpheme_counting(rng).map(Some),
            QuestionFamily::WellFormedness => self.well_formedness(rng).map(Some),
            QuestionFamily::Allomorphy => self.allomorphy(rng).map(Some),
            QuestionFamily::Irregularity => self.irregularity(rng),
        }
    }

    fn pick<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> Result<WordForm, MorphError> {
        self.lexicon.pick(category, rng).map(base_form)
    }

    /// True/false about one affix of an agent noun, possibly pluralized.
    pub fn morpheme_property<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuestionDraft, MorphError> {
        let mut word = derive_er(&self.pick(Category::Verb, rng)?);
        if rng.gen_bool(0.5) {
            word = pluralize(&word);
        }

        let affixes: Vec<&Morpheme> = word
            .morphemes
            .iter()
            .filter(|m| m.role == MorphemeRole::Affix)
            .collect();
        let Some(target) = affixes.choose(rng).copied() else {
            return Err(MorphError::insufficient(Category::Verb, "an affixed form"));
        };

        let property = MorphemeProperty::ALL[rng.gen_range(0..MorphemeProperty::ALL.len())];
        let claim_holds = rng.gen_bool(0.5);
        let stated = if property.holds(target) == claim_holds {
            property
        } else {
            property.complement()
        };
        debug_assert_eq!(stated.holds(target), claim_holds);

        let text = format!(
            "True/False: In the word \"{}\", the morpheme \"{}\" is {}.",
            word.surface,
            target.surface,
            stated.label()
        );
        Ok(true_false(
            QuestionFamily::MorphemeProperty,
            text,
            claim_holds,
            FLIPPED_MORPHEME_PROPERTY,
            &word,
        ))
    }

    /// Pick the purely inflected plural among derived forms.
    pub fn inflection_vs_derivation<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuestionDraft, MorphError> {
        retry_distinct(rng, Category::Noun, "distinct inflected and derived forms", |rng| {
            let answer = pluralize(&self.pick(Category::Noun, rng)?);
            let derived = [
                derive_er(&self.pick(Category::Verb, rng)?),
                derive_ness(&self.pick(Category::Adjective, rng)?),
                pluralize(&derive_er(&self.pick(Category::Verb, rng)?)),
            ];
            debug_assert!(!answer.has_derivational());
            debug_assert!(derived.iter().all(WordForm::has_derivational));

            let distractors = derived
                .into_iter()
                .map(|w| (w.surface, CONTAINS_DERIVATIONAL_AFFIX))
                .collect();
            Ok(multiple_choice(
                QuestionFamily::InflectionVsDerivation,
                "Which word contains only inflectional morphology?".to_string(),
                &answer,
                answer.surface.clone(),
                distractors,
            ))
        })
    }

    /// True/false: does `-ness` change the category of an adjective?
    pub fn category_change<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuestionDraft, MorphError> {
        let adjective = self.pick(Category::Adjective, rng)?;
        let derived = derive_ness(&adjective);
        let changes = derived.category != adjective.category;

        let claim_holds = rng.gen_bool(0.5);
        let claim = if changes == claim_holds {
            "changes"
        } else {
            "does not change"
        };
        let text = format!(
            "True/False: Adding \"-ness\" to \"{}\" {claim} its lexical category.",
            adjective.surface
        );
        Ok(true_false(
            QuestionFamily::CategoryChange,
            text,
            claim_holds,
            INCORRECT_CATEGORY_CHANGE_CLAIM,
            &derived,
        ))
    }

    /// Which feature does a past-tense suffix encode?
    pub fn feature_encoding<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuestionDraft, MorphError> {
        let verb = self.pick(Category::Verb, rng)?;
        let past = past_tense(&verb);
        let Some(affix) = past.last_affix() else {
            return Err(MorphError::insufficient(Category::Verb, "a past-tense form"));
        };
        let Some(answer) = encoded_feature(affix) else {
            return Err(MorphError::insufficient(Category::Verb, "a feature-bearing suffix"));
        };

        let text = if past.last_allomorph() == Some("irregular") {
            format!(
                "What grammatical feature does the irregular form \"{}\" (from \"{}\") encode?",
                past.surface, verb.surface
            )
        } else {
            format!(
                "What grammatical feature does the suffix \"-{}\" encode in \"{}\"?",
                affix.surface, past.surface
            )
        };

        let wrong: Vec<&str> = FEATURE_LABELS
            .iter()
            .copied()
            .filter(|label| *label != answer)
            .collect();
        let distractors = wrong
            .choose_multiple(rng, 3)
            .map(|label| (label.to_string(), FEATURE_MISMATCH))
            .collect();
        Ok(multiple_choice(
            QuestionFamily::FeatureEncoding,
            text,
            &past,
            answer,
            distractors,
        ))
    }

    /// Count the morphemes of a pluralized agent noun.
    pub fn morpheme_counting<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuestionDraft, MorphError> {
        let word = pluralize(&derive_er(&self.pick(Category::Verb, rng)?));
        let count = word.morpheme_count();

        let distractors = [count - 1, count + 1, count + 2]
            .into_iter()
            .map(|n| (n.to_string(), WRONG_MORPHEME_COUNT))
            .collect();
        Ok(multiple_choice(
            QuestionFamily::MorphemeCounting,
            format!("How many morphemes are in \"{}\"?", word.surface),
            &word,
            count.to_string(),
            distractors,
        ))
    }

    /// Spot the verb+`-ness` form among well-formed derivations.
    pub fn well_formedness<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<QuestionDraft, MorphError> {
        retry_distinct(rng, Category::Verb, "distinct well-formedness options", |rng| {
            let ill_formed = attach_ness_unchecked(&self.pick(Category::Verb, rng)?);
            let well_formed = [
                derive_ness(&self.pick(Category::Adjective, rng)?),
                derive_er(&self.pick(Category::Verb, rng)?),
                pluralize(&self.pick(Category::Noun, rng)?),
            ];

            let distractors = well_formed.into_iter().map(|w| (w.surface, "")).collect();
            let mut draft = multiple_choice(
                QuestionFamily::WellFormedness,
                "Which word is NOT well-formed (under the affix rules used in this quiz)?"
                    .to_string(),
                &ill_formed,
                ill_formed.surface.clone(),
                distractors,
            );
            draft.answer_violation = Some(VIOLATES_NESS_SELECTION.to_string());
            Ok(draft)
        })
    }

    /// Pick the plural spelled with the `-es` allomorph.
    pub fn allomorphy<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<QuestionDraft, MorphError> {
        let es_base = self.lexicon.pick_where(
            Category::Noun,
            "a sibilant-final stem",
            rng,
            |w| is_sibilant_final(w) && irregular_plural(w).is_none(),
        )?;
        let answer = pluralize(&base_form(es_base));

        let nouns = self
            .lexicon
            .distinct(Category::Noun)
            .into_iter()
            .map(|n| pluralize(&base_form(n)));
        let agents = self
            .lexicon
            .distinct(Category::Verb)
            .into_iter()
            .map(|v| pluralize(&derive_er(&base_form(v))));

        let mut seen = HashSet::from([answer.surface.clone()]);
        let mut default_s = Vec::new();
        let mut irregular = Vec::new();
        for plural in nouns.chain(agents) {
            // Any "es" ending reads as the asked-about allomorph.
            if plural.surface.ends_with("es") || !seen.insert(plural.surface.clone()) {
                continue;
            }
            match plural.last_allomorph() {
                Some("s") => default_s.push(plural.surface),
                Some("irregular") => irregular.push(plural.surface),
                _ => {}
            }
        }
        default_s.shuffle(rng);
        irregular.shuffle(rng);

        let distractors: Vec<(String, &str)> = default_s
            .into_iter()
            .map(|s| (s, USES_DEFAULT_PLURAL_S))
            .chain(irregular.into_iter().map(|s| (s, USES_IRREGULAR_PLURAL)))
            .take(3)
            .collect();
        if distractors.len() < 3 {
            return Err(MorphError::insufficient(
                Category::Noun,
                "three plurals without the -es allomorph",
            ));
        }

        Ok(multiple_choice(
            QuestionFamily::Allomorphy,
            "Which word contains the plural allomorph spelled \"es\"?".to_string(),
            &answer,
            answer.surface.clone(),
            distractors,
        ))
    }

    /// Pick the bank verb with an irregular past tense.
    ///
    /// Returns `Ok(None)` when no irregular verb is in the bank.
    pub fn irregularity<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Option<QuestionDraft>, MorphError> {
        let verbs = self.lexicon.distinct(Category::Verb);
        let (irregular, regular): (Vec<&str>, Vec<&str>) = verbs
            .into_iter()
            .partition(|v| irregular_past(v).is_some());

        let Some(base) = irregular.choose(rng).copied() else {
            return Ok(None);
        };
        if regular.len() < 3 {
            return Err(MorphError::insufficient(
                Category::Verb,
                "three verbs with a regular past tense",
            ));
        }

        let past = past_tense(&base_form(base));
        let distractors = regular
            .choose_multiple(rng, 3)
            .map(|v| (v.to_string(), REGULAR_PAST_ED))
            .collect();
        Ok(Some(multiple_choice(
            QuestionFamily::Irregularity,
            "Which verb has an irregular past tense?".to_string(),
            &past,
            base.to_string(),
            distractors,
        )))
    }
}

/// `tense: past` for a past-tense affix; the allomorph tag is not a feature.
fn encoded_feature(affix: &Morpheme) -> Option<String> {
    affix
        .features
        .iter()
        .find(|(k, _)| k.as_str() != "allomorph")
        .map(|(k, v)| format!("{k}: {v}"))
}

fn true_false(
    family: QuestionFamily,
    question_text: String,
    claim_holds: bool,
    flip_tag: &str,
    word: &WordForm,
) -> QuestionDraft {
    let (answer, tag) = if claim_holds {
        ("True", "")
    } else {
        ("False", flip_tag)
    };
    QuestionDraft {
        family,
        question_text,
        correct_answer: answer.to_string(),
        distractors: Vec::new(),
        violated_rule: vec![tag.to_string()],
        answer_violation: None,
        base_word: word.base.clone(),
        morphemes_used: word.morpheme_surfaces(),
    }
}

fn multiple_choice(
    family: QuestionFamily,
    question_text: String,
    word: &WordForm,
    correct_answer: String,
    distractors: Vec<(String, &str)>,
) -> QuestionDraft {
    let (distractors, violated_rule): (Vec<String>, Vec<String>) = distractors
        .into_iter()
        .map(|(d, tag)| (d, tag.to_string()))
        .unzip();
    QuestionDraft {
        family,
        question_text,
        correct_answer,
        distractors,
        violated_rule,
        answer_violation: None,
        base_word: word.base.clone(),
        morphemes_used: word.morpheme_surfaces(),
    }
}

/// Whether the answer and all distractors are pairwise distinct.
pub fn options_distinct(correct: &str, distractors: &[String]) -> bool {
    let mut seen = HashSet::new();
    seen.insert(correct) && distractors.iter().all(|d| seen.insert(d.as_str()))
}

/// Rebuild a question from fresh random draws until its options are distinct.
fn retry_distinct<R, F>(
    rng: &mut R,
    category: Category,
    requirement: &str,
    mut build: F,
) -> Result<QuestionDraft, MorphError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Result<QuestionDraft, MorphError>,
{
    for _ in 0..MAX_DISTINCT_ATTEMPTS {
        let draft = build(rng)?;
        if options_distinct(&draft.correct_answer, &draft.distractors) {
            return Ok(draft);
        }
    }
    Err(MorphError::insufficient(category, requirement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lexicon(words: &[&str]) -> Lexicon {
        Lexicon::new(words.iter().map(|w| w.to_string()).collect())
    }

    fn rich_lexicon() -> Lexicon {
        lexicon(&[
            "walk", "run", "jump", "stop", "eat", "teach", "happy", "calm", "kind", "busy", "cat",
            "fox", "bus", "dog", "child", "city", "tree", "bird",
        ])
    }

    #[test]
    fn morpheme_property_answer_matches_structure() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let q = gen.morpheme_property(&mut rng).unwrap();
            assert!(q.correct_answer == "True" || q.correct_answer == "False");
            assert_eq!(q.violated_rule.len(), 1);
            if q.correct_answer == "True" {
                assert_eq!(q.violated_rule[0], "");
            } else {
                assert_eq!(q.violated_rule[0], FLIPPED_MORPHEME_PROPERTY);
            }
            // Affixes are always bound, never roots.
            if q.question_text.ends_with("is bound.") || q.question_text.ends_with("is an affix.") {
                assert_eq!(q.correct_answer, "True");
            }
            if q.question_text.ends_with("is free.") || q.question_text.ends_with("is a root.") {
                assert_eq!(q.correct_answer, "False");
            }
            if q.question_text.contains("morpheme \"er\" is derivational") {
                assert_eq!(q.correct_answer, "True");
            }
            if q.question_text.contains("morpheme \"s\" is derivational") {
                assert_eq!(q.correct_answer, "False");
            }
        }
    }

    #[test]
    fn property_complements_disagree_on_affixes() {
        let affix = Morpheme::affix("s", MorphType::Inflectional, Default::default());
        for p in MorphemeProperty::ALL {
            assert_ne!(p.holds(&affix), p.complement().holds(&affix));
        }
    }

    #[test]
    fn inflection_vs_derivation_has_one_purely_inflected_option() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let q = gen.inflection_vs_derivation(&mut rng).unwrap();
            assert_eq!(q.distractors.len(), 3);
            assert!(q.violated_rule.iter().all(|t| t == CONTAINS_DERIVATIONAL_AFFIX));
            assert!(options_distinct(&q.correct_answer, &q.distractors));
            assert_eq!(q.morphemes_used.len(), 2);
        }
    }

    #[test]
    fn category_change_is_true_unless_flipped() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let q = gen.category_change(&mut rng).unwrap();
            if q.question_text.contains("does not change") {
                assert_eq!(q.correct_answer, "False");
                assert_eq!(q.violated_rule, vec![INCORRECT_CATEGORY_CHANGE_CLAIM]);
            } else {
                assert_eq!(q.correct_answer, "True");
                assert_eq!(q.violated_rule, vec![""]);
            }
        }
    }

    #[test]
    fn feature_encoding_answers_tense_past() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            let q = gen.feature_encoding(&mut rng).unwrap();
            assert_eq!(q.correct_answer, "tense: past");
            assert_eq!(q.distractors.len(), 3);
            assert!(options_distinct(&q.correct_answer, &q.distractors));
            assert!(q.violated_rule.iter().all(|t| t == FEATURE_MISMATCH));
        }
    }

    #[test]
    fn morpheme_counting_counts_three() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(2);
        let q = gen.morpheme_counting(&mut rng).unwrap();
        assert_eq!(q.correct_answer, "3");
        assert_eq!(q.distractors, vec!["2", "4", "5"]);
        assert_eq!(q.morphemes_used.len(), 3);
    }

    #[test]
    fn well_formedness_answer_is_verb_plus_ness() {
        let lex = lexicon(&["run", "happy", "cat", "fox", "child"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(4);
        let q = gen.well_formedness(&mut rng).unwrap();
        assert_eq!(q.correct_answer, "runness");
        assert_eq!(q.answer_violation.as_deref(), Some(VIOLATES_NESS_SELECTION));
        assert_eq!(q.violated_rule, vec!["", "", ""]);
        assert!(q.distractors.contains(&"happiness".to_string()));
        assert!(q.distractors.contains(&"runer".to_string()));
    }

    #[test]
    fn allomorphy_with_a_small_bank() {
        let lex = lexicon(&["run", "happy", "cat", "fox", "child"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(9);
        let q = gen.allomorphy(&mut rng).unwrap();
        assert_eq!(q.correct_answer, "foxes");

        let mut distractors = q.distractors.clone();
        distractors.sort();
        assert_eq!(distractors, vec!["cats", "children", "runers"]);
        let irregular_slot = q.distractors.iter().position(|d| d == "children").unwrap();
        assert_eq!(q.violated_rule[irregular_slot], USES_IRREGULAR_PLURAL);
    }

    #[test]
    fn allomorphy_prefers_default_s_distractors() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..50 {
            let q = gen.allomorphy(&mut rng).unwrap();
            assert!(q.correct_answer == "foxes" || q.correct_answer == "buses");
            assert!(q.violated_rule.iter().all(|t| t == USES_DEFAULT_PLURAL_S));
            assert!(q.distractors.iter().all(|d| !d.ends_with("es")));
        }
    }

    #[test]
    fn allomorphy_skips_default_plurals_spelled_es() {
        let lex = lexicon(&["fox", "tree", "horse", "cat", "dog", "bird"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let q = gen.allomorphy(&mut rng).unwrap();
            assert_eq!(q.correct_answer, "foxes");
            assert!(!q.distractors.contains(&"trees".to_string()));
            assert!(!q.distractors.contains(&"horses".to_string()));
            let mut distractors = q.distractors.clone();
            distractors.sort();
            assert_eq!(distractors, vec!["birds", "cats", "dogs"]);
        }
    }

    #[test]
    fn allomorphy_fails_when_only_es_plurals_remain() {
        let lex = lexicon(&["fox", "tree", "horse", "cat"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(gen.allomorphy(&mut rng).unwrap_err().is_skippable());
    }

    #[test]
    fn allomorphy_without_sibilant_nouns_fails_fast() {
        let lex = lexicon(&["run", "happy", "cat", "dog"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        let err = gen.allomorphy(&mut rng).unwrap_err();
        assert!(err.is_skippable());
    }

    #[test]
    fn irregularity_skips_without_irregular_verbs() {
        let lex = lexicon(&["walk", "jump", "stop", "cat", "happy"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(gen.irregularity(&mut rng).unwrap().is_none());
    }

    #[test]
    fn irregularity_needs_three_regular_verbs() {
        let lex = lexicon(&["run", "happy", "cat", "fox", "child"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(gen.irregularity(&mut rng).unwrap_err().is_skippable());
    }

    #[test]
    fn irregularity_picks_the_table_verb() {
        let lex = rich_lexicon();
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..50 {
            let q = gen.irregularity(&mut rng).unwrap().unwrap();
            assert!(irregular_past(&q.correct_answer).is_some());
            assert!(q.distractors.iter().all(|d| irregular_past(d).is_none()));
            assert!(options_distinct(&q.correct_answer, &q.distractors));
            assert!(q.violated_rule.iter().all(|t| t == REGULAR_PAST_ED));
        }
    }

    #[test]
    fn missing_adjectives_surface_as_insufficient_lexicon() {
        let lex = lexicon(&["run", "cat"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        let err = gen
            .generate(QuestionFamily::CategoryChange, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            MorphError::InsufficientLexicon {
                category: Category::Adjective,
                ..
            }
        ));
    }

    #[test]
    fn undistinguishable_options_give_up() {
        // The only noun is the agent noun of the only verb, so options always collide.
        let lex = lexicon(&["run", "happy", "runer"]);
        let gen = FamilyGenerator::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(gen.inflection_vs_derivation(&mut rng).unwrap_err().is_skippable());
    }
}
