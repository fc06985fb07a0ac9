//! Shared types for consolidated keyboard lexicon data.
//!
//! Raw query results arrive as flat attribute maps ([`RawRecord`]); the
//! consolidation passes turn them into one entry per surface form. Internally
//! the "what is this form's plural" and "which roles does it play" questions
//! are answered with tagged variants ([`Plural`], [`Form`]); the legacy
//! sentinel strings (`isPlural`, `noPlural`, `noForm`) only appear once an
//! entry is rendered into its output shape ([`NounRecord`]).
//!
//! ```rust
//! use scribe_types::{Form, LexicalEntry, Plural, RawRecord, WordKind};
//!
//! let record = RawRecord::from([("singular", "Wort"), ("gender", "neuter")]);
//! assert_eq!(record.get("singular"), Some("Wort"));
//! assert_eq!(WordKind::from_name("nouns"), Some(WordKind::Nouns));
//!
//! let mut entry = LexicalEntry::default();
//! entry.form.add_tag("N");
//! entry.plural = Plural::SelfReferential("Wort".into());
//! let out = entry.to_record("noForm", "noPlural");
//! assert_eq!(out.plural, "Wort");
//! assert_eq!(out.form, "N");
//! assert!(matches!(Form::default(), Form::Unknown));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Tag added to every surface form attested as somebody's plural.
pub const PLURAL_TAG: &str = "PL";

/// Output spelling of [`Plural::IsPlural`].
pub const IS_PLURAL: &str = "isPlural";

/// Output spelling of [`Plural::NoPlural`].
pub const NO_PLURAL: &str = "noPlural";

/// Word type a list of queried records describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum WordKind {
    Nouns,
    Verbs,
    Prepositions,
}

impl WordKind {
    pub const ALL: [WordKind; 3] = [WordKind::Nouns, WordKind::Verbs, WordKind::Prepositions];

    /// Parse the directory-style name (`nouns`, `verbs`, `prepositions`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nouns" | "noun" => Some(WordKind::Nouns),
            "verbs" | "verb" => Some(WordKind::Verbs),
            "prepositions" | "preposition" => Some(WordKind::Prepositions),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordKind::Nouns => "nouns",
            WordKind::Verbs => "verbs",
            WordKind::Prepositions => "prepositions",
        }
    }

    /// File name the query layer writes its results to (`nounsQueried.json`).
    pub fn queried_file_name(self) -> String {
        format!("{}Queried.json", self.as_str())
    }

    /// File name of the formatted output (`nouns.json`).
    pub fn output_file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for WordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flat observation from the query layer.
///
/// Absence of a key means "not attested in this observation", never "empty".
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawRecord {
    attrs: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attrs.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for RawRecord {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// What is known about a surface form's plural.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Plural {
    /// Nothing attested yet.
    #[default]
    Unknown,
    /// Attested as having no plural.
    NoPlural,
    /// This form is itself a plural with no recorded singular back-reference.
    IsPlural,
    /// The form is its own plural.
    SelfReferential(String),
    /// The plural is another surface form.
    Named(String),
}

impl Plural {
    /// Precedence used when merging observations; higher carries more information.
    pub fn rank(&self) -> u8 {
        match self {
            Plural::Unknown => 0,
            Plural::IsPlural => 1,
            Plural::NoPlural => 2,
            Plural::SelfReferential(_) | Plural::Named(_) => 3,
        }
    }

    /// The plural's surface form, when one is recorded.
    pub fn surface(&self) -> Option<&str> {
        match self {
            Plural::SelfReferential(form) | Plural::Named(form) => Some(form),
            _ => None,
        }
    }

    /// Legacy output spelling.
    pub fn as_output(&self) -> &str {
        match self {
            Plural::Unknown => "",
            Plural::NoPlural => NO_PLURAL,
            Plural::IsPlural => IS_PLURAL,
            Plural::SelfReferential(form) | Plural::Named(form) => form,
        }
    }
}

/// Every grammatical role a surface form is attested to play.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Form {
    /// Nothing attested.
    #[default]
    Unknown,
    /// Attested with a plural but without a gender; later tags replace it.
    NoGender,
    /// Tags in the order they were first observed.
    Tags(Vec<String>),
}

impl Form {
    pub fn has_tag(&self, tag: &str) -> bool {
        match self {
            Form::Tags(tags) => tags.iter().any(|t| t == tag),
            _ => false,
        }
    }

    /// Append `tag` unless already present. Sentinels are replaced outright.
    pub fn add_tag(&mut self, tag: &str) {
        match self {
            Form::Tags(tags) => {
                if !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_string());
                }
            }
            Form::Unknown | Form::NoGender => *self = Form::Tags(vec![tag.to_string()]),
        }
    }

    /// Record that the form was seen without any gender.
    pub fn mark_no_gender(&mut self) {
        if matches!(self, Form::Unknown) {
            *self = Form::NoGender;
        }
    }

    /// `/`-joined compound, not yet deduplicated or sorted.
    pub fn compound(&self, no_gender: &str) -> String {
        match self {
            Form::Unknown => String::new(),
            Form::NoGender => no_gender.to_string(),
            Form::Tags(tags) => tags.join("/"),
        }
    }
}

/// Consolidated noun entry keyed by its surface form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LexicalEntry {
    pub plural: Plural,
    pub form: Form,
}

impl LexicalEntry {
    /// Render into the legacy output shape with a raw (unnormalized) form.
    ///
    /// `no_gender` and `no_plural` are the per-language spellings of
    /// [`Form::NoGender`] and [`Plural::NoPlural`].
    pub fn to_record(&self, no_gender: &str, no_plural: &str) -> NounRecord {
        let plural = match self.plural {
            Plural::NoPlural => no_plural,
            ref other => other.as_output(),
        };
        NounRecord {
            plural: plural.to_string(),
            form: self.form.compound(no_gender),
        }
    }
}

/// Output shape of a noun entry: `{"plural": ..., "form": ...}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct NounRecord {
    pub plural: String,
    pub form: String,
}

/// Conjugation table keyed by slot name, kept in configured slot order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VerbEntry {
    slots: Vec<(String, String)>,
}

impl VerbEntry {
    /// Create an entry with every slot present and empty.
    pub fn with_slots<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: names
                .into_iter()
                .map(|name| (name.into(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_mut(&mut self, slot: &str) -> Option<&mut String> {
        self.slots
            .iter_mut()
            .find(|(name, _)| name == slot)
            .map(|(_, value)| value)
    }

    /// Overwrite a slot. Returns `false` if the slot is not part of this table.
    pub fn set(&mut self, slot: &str, value: impl Into<String>) -> bool {
        match self.get_mut(slot) {
            Some(current) => {
                *current = value.into();
                true
            }
            None => false,
        }
    }

    /// Rename a slot in place, keeping its position.
    pub fn rename(&mut self, from: &str, to: &str) {
        if let Some((name, _)) = self.slots.iter_mut().find(|(name, _)| name == from) {
            *name = to.to_string();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Serialize for VerbEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, value) in &self.slots {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_replaces_sentinels_and_skips_duplicates() {
        let mut form = Form::default();
        form.mark_no_gender();
        assert_eq!(form, Form::NoGender);
        assert_eq!(form.compound("noForm"), "noForm");

        form.add_tag(PLURAL_TAG);
        form.add_tag("M");
        form.add_tag(PLURAL_TAG);
        assert_eq!(form.compound("noForm"), "PL/M");

        form.mark_no_gender();
        assert!(form.has_tag("M"));
        assert!(!form.has_tag("F"));
    }

    #[test]
    fn plural_ranks_and_output_spellings() {
        assert!(Plural::Named("x".into()).rank() > Plural::NoPlural.rank());
        assert!(Plural::NoPlural.rank() > Plural::IsPlural.rank());
        assert!(Plural::IsPlural.rank() > Plural::Unknown.rank());
        assert_eq!(Plural::IsPlural.as_output(), "isPlural");
        assert_eq!(Plural::NoPlural.as_output(), "noPlural");
        assert_eq!(Plural::Unknown.as_output(), "");
        assert_eq!(Plural::SelfReferential("Wort".into()).surface(), Some("Wort"));
        assert_eq!(Plural::IsPlural.surface(), None);
    }

    #[test]
    fn verb_entry_serializes_in_slot_order() {
        let mut entry = VerbEntry::with_slots(["presFPS", "auxiliaryVerb", "perfFPS"]);
        assert!(entry.set("perfFPS", "bin gegangen"));
        assert!(!entry.set("unknownSlot", "x"));
        entry.rename("presFPS", "presentFPS");

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"presentFPS":"","auxiliaryVerb":"","perfFPS":"bin gegangen"}"#
        );
    }

    #[test]
    fn no_plural_spelling_is_chosen_by_the_caller() {
        let entry = LexicalEntry {
            plural: Plural::NoPlural,
            form: Form::Tags(vec!["N".into()]),
        };
        assert_eq!(entry.to_record("noForm", "noPlural").plural, "noPlural");
        assert_eq!(entry.to_record("", "").plural, "");

        let named = LexicalEntry {
            plural: Plural::Named("Häuser".into()),
            form: Form::NoGender,
        };
        let out = named.to_record("noForm", "");
        assert_eq!(out.plural, "Häuser");
        assert_eq!(out.form, "noForm");
    }

    #[test]
    fn word_kind_names() {
        assert_eq!(WordKind::from_name("Prepositions"), Some(WordKind::Prepositions));
        assert_eq!(WordKind::from_name("adjectives"), None);
        assert_eq!(WordKind::Verbs.queried_file_name(), "verbsQueried.json");
        assert_eq!(WordKind::Nouns.output_file_name(), "nouns.json");
        assert_eq!(WordKind::Nouns.to_string(), "nouns");
    }
}
