//! Per-language configuration consumed by the consolidation passes.
//!
//! The passes themselves are language-agnostic; everything that differs
//! between languages (attribute names, code-to-tag maps, the single-tag
//! alphabet, tense slots, auxiliary paradigms, sentinel spellings) lives here.

use std::collections::BTreeMap;
use std::fmt;

use scribe_types::{NO_PLURAL, WordKind};
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

const PERSONS: [&str; 6] = ["FPS", "SPS", "TPS", "FPP", "SPP", "TPP"];

/// Languages with a built-in profile.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Language {
    French,
    German,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::French,
        Language::German,
        Language::Portuguese,
        Language::Russian,
        Language::Spanish,
        Language::Swedish,
    ];

    /// Parse an English language name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "french" => Some(Language::French),
            "german" => Some(Language::German),
            "portuguese" => Some(Language::Portuguese),
            "russian" => Some(Language::Russian),
            "spanish" => Some(Language::Spanish),
            "swedish" => Some(Language::Swedish),
            _ => None,
        }
    }

    /// Directory name used by the data layout (`German`).
    pub fn as_str(self) -> &'static str {
        match self {
            Language::French => "French",
            Language::German => "German",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Spanish => "Spanish",
            Language::Swedish => "Swedish",
        }
    }

    pub fn profile(self) -> LanguageProfile {
        match self {
            Language::French => LanguageProfile::french(),
            Language::German => LanguageProfile::german(),
            Language::Portuguese => LanguageProfile::portuguese(),
            Language::Russian => LanguageProfile::russian(),
            Language::Spanish => LanguageProfile::spanish(),
            Language::Swedish => LanguageProfile::swedish(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_name(s).ok_or_else(|| ProfileError::UnknownLanguage(s.to_string()))
    }
}

/// Parse a word type name (`nouns`, `verbs`, `prepositions`).
pub fn parse_word_kind(raw: &str) -> Result<WordKind, ProfileError> {
    WordKind::from_name(raw).ok_or_else(|| ProfileError::UnknownWordKind(raw.to_string()))
}

/// Everything the consolidation core needs to know about one language.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nouns: Option<NounProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbs: Option<VerbProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepositions: Option<PrepositionProfile>,
}

/// A `(singular, plural)` attribute-name pair.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct NumberKeys {
    pub singular: String,
    pub plural: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NounProfile {
    /// Tried in order; the first pair whose singular key is present wins.
    pub number_keys: Vec<NumberKeys>,
    #[serde(default = "default_gender_key")]
    pub gender_key: String,
    /// Gender label or Wikidata id to tag.
    pub genders: BTreeMap<String, String>,
    /// Tags that are returned unchanged by the normalizer.
    pub single_tags: Vec<String>,
    /// Output spelling of "seen with a plural but no gender".
    #[serde(default)]
    pub no_gender_sentinel: String,
    /// Output spelling of "seen with a gender but no plural".
    #[serde(default = "default_no_plural_sentinel")]
    pub no_plural_sentinel: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbProfile {
    #[serde(default = "default_infinitive_key")]
    pub infinitive_key: String,
    /// Output slots, in output order.
    pub slots: Vec<String>,
    /// Slot names rewritten on output (`pastPerfectFPS` to `imperfectFPS`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub renames: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<AuxiliaryProfile>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliaryProfile {
    /// Attribute carrying the auxiliary code; also the slot holding its name.
    pub key: String,
    pub participle_key: String,
    /// Slots synthesized as `<auxiliary form> <participle>`.
    pub perfect_slots: Vec<String>,
    /// Auxiliary code (lexeme id or name) to paradigm name.
    pub codes: BTreeMap<String, String>,
    /// Paradigms in the order they are joined for verbs taking several.
    pub paradigms: Vec<Paradigm>,
}

/// Helper-verb forms aligned with [`AuxiliaryProfile::perfect_slots`].
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct Paradigm {
    pub name: String,
    pub forms: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepositionProfile {
    #[serde(default = "default_preposition_key")]
    pub preposition_key: String,
    #[serde(default = "default_case_key")]
    pub case_key: String,
    /// Case label (with any ` case` suffix removed) to tag.
    pub cases: BTreeMap<String, String>,
    pub single_tags: Vec<String>,
    /// Whether a row with no case at all still yields an (empty) entry.
    #[serde(default = "default_keep_caseless")]
    pub keep_caseless: bool,
}

fn default_gender_key() -> String {
    "gender".into()
}

fn default_no_plural_sentinel() -> String {
    NO_PLURAL.into()
}

fn default_infinitive_key() -> String {
    "infinitive".into()
}

fn default_preposition_key() -> String {
    "preposition".into()
}

fn default_case_key() -> String {
    "case".into()
}

fn default_keep_caseless() -> bool {
    true
}

impl LanguageProfile {
    /// Parse and validate a custom profile.
    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        let profile: LanguageProfile = serde_json::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn supports(&self, kind: WordKind) -> bool {
        match kind {
            WordKind::Nouns => self.nouns.is_some(),
            WordKind::Verbs => self.verbs.is_some(),
            WordKind::Prepositions => self.prepositions.is_some(),
        }
    }

    pub fn nouns(&self) -> Result<&NounProfile, ProfileError> {
        self.nouns.as_ref().ok_or_else(|| self.unsupported(WordKind::Nouns))
    }

    pub fn verbs(&self) -> Result<&VerbProfile, ProfileError> {
        self.verbs.as_ref().ok_or_else(|| self.unsupported(WordKind::Verbs))
    }

    pub fn prepositions(&self) -> Result<&PrepositionProfile, ProfileError> {
        self.prepositions
            .as_ref()
            .ok_or_else(|| self.unsupported(WordKind::Prepositions))
    }

    fn unsupported(&self, kind: WordKind) -> ProfileError {
        ProfileError::Unsupported {
            language: self.name.clone(),
            kind,
        }
    }

    /// Check the internal consistency a consolidation pass relies on.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let invalid = |message: String| ProfileError::Invalid {
            language: self.name.clone(),
            message,
        };

        if let Some(nouns) = &self.nouns
            && nouns.number_keys.is_empty()
        {
            return Err(invalid("nouns need at least one singular/plural key pair".into()));
        }

        if let Some(verbs) = &self.verbs
            && let Some(aux) = &verbs.auxiliary
        {
            for slot in &aux.perfect_slots {
                if !verbs.slots.contains(slot) {
                    return Err(invalid(format!("perfect slot `{slot}` is not a verb slot")));
                }
            }
            for paradigm in &aux.paradigms {
                if paradigm.forms.len() != aux.perfect_slots.len() {
                    return Err(invalid(format!(
                        "paradigm `{}` has {} forms for {} perfect slots",
                        paradigm.name,
                        paradigm.forms.len(),
                        aux.perfect_slots.len()
                    )));
                }
            }
            for (code, name) in &aux.codes {
                if !aux.paradigms.iter().any(|p| &p.name == name) {
                    return Err(invalid(format!(
                        "auxiliary code `{code}` maps to unknown paradigm `{name}`"
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn german() -> Self {
        let mut slots = strings(&["pastParticiple", "auxiliaryVerb"]);
        slots.extend(person_slots("pres"));
        slots.extend(person_slots("pret"));
        slots.extend(person_slots("perf"));

        Self {
            name: Language::German.to_string(),
            nouns: Some(NounProfile {
                number_keys: vec![number_keys("singular", "plural")],
                gender_key: default_gender_key(),
                genders: mapping(&[
                    ("masculine", "M"),
                    ("Q499327", "M"),
                    ("feminine", "F"),
                    ("Q1775415", "F"),
                    ("neuter", "N"),
                    ("Q1775461", "N"),
                ]),
                single_tags: strings(&["F", "M", "N", "PL"]),
                no_gender_sentinel: "noForm".into(),
                no_plural_sentinel: default_no_plural_sentinel(),
            }),
            verbs: Some(VerbProfile {
                infinitive_key: default_infinitive_key(),
                slots,
                renames: BTreeMap::new(),
                auxiliary: Some(AuxiliaryProfile {
                    key: "auxiliaryVerb".into(),
                    participle_key: "pastParticiple".into(),
                    perfect_slots: person_slots("perf"),
                    codes: mapping(&[
                        ("L1761", "sein"),
                        ("sein", "sein"),
                        ("L4179", "haben"),
                        ("haben", "haben"),
                    ]),
                    paradigms: vec![
                        Paradigm {
                            name: "sein".into(),
                            forms: strings(&["bin", "bist", "ist", "sind", "seid", "sind"]),
                        },
                        Paradigm {
                            name: "haben".into(),
                            forms: strings(&["habe", "hast", "hat", "haben", "habt", "haben"]),
                        },
                    ],
                }),
            }),
            prepositions: Some(PrepositionProfile {
                preposition_key: default_preposition_key(),
                case_key: default_case_key(),
                cases: mapping(&[("accusative", "Akk"), ("dative", "Dat"), ("genitive", "Gen")]),
                single_tags: strings(&["Akk", "Dat", "Gen"]),
                keep_caseless: true,
            }),
        }
    }

    pub fn russian() -> Self {
        Self {
            name: Language::Russian.to_string(),
            nouns: Some(NounProfile {
                number_keys: vec![number_keys("singular", "plural")],
                gender_key: default_gender_key(),
                genders: mapping(&[
                    ("masculine", "M"),
                    ("Q499327", "M"),
                    ("feminine", "F"),
                    ("Q1775415", "F"),
                    ("neuter", "N"),
                    ("Q1775461", "N"),
                ]),
                single_tags: strings(&["F", "M", "N", "PL"]),
                no_gender_sentinel: String::new(),
                no_plural_sentinel: default_no_plural_sentinel(),
            }),
            verbs: None,
            prepositions: Some(PrepositionProfile {
                preposition_key: default_preposition_key(),
                case_key: default_case_key(),
                cases: mapping(&[
                    ("accusative", "Akk"),
                    ("dative", "Dat"),
                    ("genitive", "Gen"),
                    ("instrumental", "Ins"),
                    ("prepositional", "Pre"),
                    ("locative", "Loc"),
                    ("nominative", "Nom"),
                ]),
                single_tags: strings(&["Akk", "Dat", "Gen", "Ins", "Pre", "Loc", "Nom"]),
                keep_caseless: false,
            }),
        }
    }

    /// Extrapolated: verb slots follow the French query without its rename,
    /// noun sentinels follow Portuguese.
    pub fn spanish() -> Self {
        Self {
            name: Language::Spanish.to_string(),
            nouns: Some(NounProfile {
                number_keys: vec![number_keys("singular", "plural")],
                gender_key: default_gender_key(),
                genders: mapping(&[("masculine", "M"), ("feminine", "F")]),
                single_tags: strings(&["F", "M", "PL"]),
                no_gender_sentinel: String::new(),
                no_plural_sentinel: String::new(),
            }),
            verbs: Some(simple_verbs(&["indicativePresent", "preterite", "pastPerfect"])),
            prepositions: None,
        }
    }

    pub fn portuguese() -> Self {
        Self {
            name: Language::Portuguese.to_string(),
            nouns: Some(NounProfile {
                number_keys: vec![number_keys("singular", "plural")],
                gender_key: default_gender_key(),
                genders: mapping(&[
                    ("masculine", "M"),
                    ("Q499327", "M"),
                    ("feminine", "F"),
                    ("Q1775415", "F"),
                ]),
                single_tags: strings(&["F", "M", "PL"]),
                no_gender_sentinel: String::new(),
                no_plural_sentinel: String::new(),
            }),
            verbs: Some(simple_verbs(&[
                "indicativePresent",
                "pastPerfect",
                "pastImperfect",
                "futureSimple",
            ])),
            prepositions: None,
        }
    }

    pub fn swedish() -> Self {
        Self {
            name: Language::Swedish.to_string(),
            nouns: Some(NounProfile {
                number_keys: vec![
                    number_keys("nominativeSingular", "nominativePlural"),
                    number_keys("genitiveSingular", "genitivePlural"),
                ],
                gender_key: default_gender_key(),
                genders: mapping(&[
                    ("common gender", "C"),
                    ("Q1305037", "C"),
                    ("neuter", "N"),
                    ("Q1775461", "N"),
                ]),
                single_tags: strings(&["C", "N", "PL"]),
                no_gender_sentinel: String::new(),
                no_plural_sentinel: String::new(),
            }),
            verbs: None,
            prepositions: None,
        }
    }

    pub fn french() -> Self {
        let mut verbs = simple_verbs(&["indicativePresent", "preterite", "pastPerfect"]);
        // The query uses `pastPerfect` for what the keyboard calls the imperfect.
        verbs.renames = PERSONS
            .iter()
            .map(|p| (format!("pastPerfect{p}"), format!("imperfect{p}")))
            .collect();

        Self {
            name: Language::French.to_string(),
            nouns: None,
            verbs: Some(verbs),
            prepositions: None,
        }
    }
}

fn simple_verbs(tenses: &[&str]) -> VerbProfile {
    VerbProfile {
        infinitive_key: default_infinitive_key(),
        slots: tenses.iter().flat_map(|t| person_slots(t)).collect(),
        renames: BTreeMap::new(),
        auxiliary: None,
    }
}

fn person_slots(tense: &str) -> Vec<String> {
    PERSONS.iter().map(|p| format!("{tense}{p}")).collect()
}

fn number_keys(singular: &str, plural: &str) -> NumberKeys {
    NumberKeys {
        singular: singular.into(),
        plural: plural.into(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
