//! Consolidation passes that fold partial lexical attestations into one entry
//! per surface form.
//!
//! Query layers emit one flat row per (lemma, attribute) combination, so a
//! noun with two genders or a verb with two auxiliaries arrives as several
//! rows. The passes here merge them deterministically:
//!
//! - [`FormConsolidator`] builds noun entries (gender tags, plural links,
//!   plural-only forms);
//! - [`ConjugationMerger`] fills verb conjugation slots and synthesizes
//!   perfect-tense forms from auxiliaries and participles;
//! - [`PrepositionConsolidator`] unions the cases a preposition governs;
//! - [`AnnotationNormalizer`] puts `/`-joined annotations in canonical order.
//!
//! Language differences live in a [`LanguageProfile`], never in code.
//!
//! # Example
//! ```rust
//! use scribe_consolidate::{LanguageProfile, consolidate, render_nouns};
//! use scribe_types::RawRecord;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = LanguageProfile::german();
//! let nouns = profile.nouns()?;
//! let records = vec![
//!     RawRecord::from([("singular", "Wort"), ("plural", "Wörter"), ("gender", "neuter")]),
//!     RawRecord::from([("singular", "Wort"), ("plural", "Worte")]),
//! ];
//! let entries = consolidate(&records, nouns)?;
//! let out = render_nouns(&entries, nouns);
//! assert_eq!(out["Wort"].form, "N");
//! assert_eq!(out["Wörter"].form, "PL");
//! assert_eq!(out["Worte"].form, "PL");
//! # Ok(()) }
//! ```

mod conjugations;
mod error;
mod forms;
mod normalize;
mod prepositions;
mod profile;
mod record;

pub use conjugations::{ConjugationMerger, merge_conjugations};
pub use error::{MalformedReason, MalformedRecordError, ProfileError};
pub use forms::{FormConsolidator, consolidate, render_nouns};
pub use normalize::AnnotationNormalizer;
pub use prepositions::{PrepositionConsolidator, consolidate_prepositions};
pub use profile::{
    AuxiliaryProfile, Language, LanguageProfile, NounProfile, NumberKeys, Paradigm,
    PrepositionProfile, VerbProfile, parse_word_kind,
};
pub use record::{decode_record, decode_records};
