use std::collections::BTreeMap;

use scribe_types::{Form, RawRecord};
use tracing::{debug, info};

use crate::error::{MalformedReason, MalformedRecordError};
use crate::normalize::AnnotationNormalizer;
use crate::profile::PrepositionProfile;

/// Collects the cases each preposition governs.
///
/// A row with an unrecognized case still registers the preposition, with an
/// empty annotation, but never erases cases seen in other rows. Rows with no
/// case at all do the same only when the profile keeps caseless rows.
pub struct PrepositionConsolidator<'p> {
    profile: &'p PrepositionProfile,
    entries: BTreeMap<String, Form>,
}

impl<'p> PrepositionConsolidator<'p> {
    pub fn new(profile: &'p PrepositionProfile) -> Self {
        Self {
            profile,
            entries: BTreeMap::new(),
        }
    }

    pub fn observe(
        &mut self,
        position: usize,
        record: &RawRecord,
    ) -> Result<(), MalformedRecordError> {
        let profile = self.profile;
        let preposition = match record.get(&profile.preposition_key) {
            None => return Ok(()),
            Some("") => {
                return Err(MalformedRecordError::new(
                    position,
                    MalformedReason::EmptyValue {
                        key: profile.preposition_key.clone(),
                    },
                ));
            }
            Some(p) => p,
        };

        let case = record.get(&profile.case_key);
        if case.is_none() && !profile.keep_caseless {
            debug!(position, preposition, "record has no case, ignoring");
            return Ok(());
        }

        let tag = case.and_then(|raw| {
            let label = case_label(raw);
            let tag = profile.cases.get(label);
            if tag.is_none() {
                debug!(position, preposition, case = raw, "unmapped case, no tag added");
            }
            tag
        });

        let form = self.entries.entry(preposition.to_string()).or_default();
        if let Some(tag) = tag {
            form.add_tag(tag);
        }
        Ok(())
    }

    /// Finish with normalized annotations.
    pub fn finish(self) -> BTreeMap<String, String> {
        info!(prepositions = self.entries.len(), "consolidated preposition cases");
        let normalizer = AnnotationNormalizer::new(self.profile.single_tags.iter().cloned());
        self.entries
            .into_iter()
            .map(|(preposition, form)| {
                let annotation = normalizer.normalize(&form.compound(""));
                (preposition, annotation)
            })
            .collect()
    }
}

/// `"dative case"` and `"dative"` both name the dative.
fn case_label(raw: &str) -> &str {
    raw.split(" case").next().unwrap_or(raw).trim()
}

pub fn consolidate_prepositions(
    records: &[RawRecord],
    profile: &PrepositionProfile,
) -> Result<BTreeMap<String, String>, MalformedRecordError> {
    let mut consolidator = PrepositionConsolidator::new(profile);
    for (position, record) in records.iter().enumerate() {
        consolidator.observe(position, record)?;
    }
    Ok(consolidator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LanguageProfile;

    fn rec<const N: usize>(pairs: [(&str, &str); N]) -> RawRecord {
        RawRecord::from(pairs)
    }

    #[test]
    fn unions_cases_in_alphabetical_order() {
        let profile = LanguageProfile::russian().prepositions.unwrap();
        let out = consolidate_prepositions(
            &[
                rec([("preposition", "mit"), ("case", "instrumental")]),
                rec([("preposition", "mit"), ("case", "dative")]),
                rec([("preposition", "mit"), ("case", "dative case")]),
            ],
            &profile,
        )
        .unwrap();
        assert_eq!(out["mit"], "Dat/Ins");
    }

    #[test]
    fn caseless_rows_register_without_erasing() {
        let profile = LanguageProfile::german().prepositions.unwrap();
        let out = consolidate_prepositions(
            &[
                rec([("preposition", "wegen"), ("case", "genitive case")]),
                rec([("preposition", "wegen")]),
                rec([("preposition", "ab")]),
                rec([("preposition", "ab"), ("case", "ablative")]),
                rec([("case", "dative")]),
            ],
            &profile,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out["wegen"], "Gen");
        assert_eq!(out["ab"], "");
    }

    #[test]
    fn caseless_rows_are_dropped_when_the_profile_says_so() {
        let profile = LanguageProfile::russian().prepositions.unwrap();
        let out = consolidate_prepositions(
            &[
                rec([("preposition", "вне")]),
                rec([("preposition", "к")]),
                rec([("preposition", "к"), ("case", "dative case")]),
                rec([("preposition", "про"), ("case", "vocative case")]),
            ],
            &profile,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert!(!out.contains_key("вне"));
        assert_eq!(out["к"], "Dat");
        assert_eq!(out["про"], "");
    }

    #[test]
    fn empty_preposition_is_malformed() {
        let profile = LanguageProfile::german().prepositions.unwrap();
        let err = consolidate_prepositions(&[rec([("preposition", "")])], &profile).unwrap_err();
        assert_eq!(err.position, 0);
        assert_eq!(
            err.to_string(),
            "malformed record at position 0: `preposition` is declared but empty"
        );
    }

    #[test]
    fn strips_case_suffix() {
        assert_eq!(case_label("accusative case"), "accusative");
        assert_eq!(case_label("dative"), "dative");
    }
}
