use std::collections::BTreeMap;

use scribe_types::{RawRecord, VerbEntry};
use tracing::{debug, info, warn};

use crate::error::{MalformedReason, MalformedRecordError};
use crate::profile::{AuxiliaryProfile, VerbProfile};

/// Merges verb rows that share an infinitive into one conjugation table.
///
/// Slot attributes are copied verbatim the first time they are seen and never
/// overwritten by later rows. For profiles with an auxiliary table, the
/// perfect-tense slots are synthesized as `<auxiliary form> <participle>`;
/// a verb attested with several auxiliaries gets `/`-joined helper forms
/// (`bin/habe`) in the profile's paradigm order.
pub struct ConjugationMerger<'p> {
    profile: &'p VerbProfile,
    drafts: BTreeMap<String, VerbDraft>,
    observed: usize,
}

struct VerbDraft {
    entry: VerbEntry,
    /// Indices into the profile's paradigms, ascending.
    auxiliaries: Vec<usize>,
}

impl<'p> ConjugationMerger<'p> {
    pub fn new(profile: &'p VerbProfile) -> Self {
        Self {
            profile,
            drafts: BTreeMap::new(),
            observed: 0,
        }
    }

    pub fn observe(
        &mut self,
        position: usize,
        record: &RawRecord,
    ) -> Result<(), MalformedRecordError> {
        let profile = self.profile;
        let infinitive = match record.get(&profile.infinitive_key) {
            None => {
                debug!(position, "record has no infinitive, ignoring");
                return Ok(());
            }
            Some("") => {
                return Err(MalformedRecordError::new(
                    position,
                    MalformedReason::EmptyValue {
                        key: profile.infinitive_key.clone(),
                    },
                ));
            }
            Some(inf) => inf,
        };
        self.observed += 1;

        let draft = self
            .drafts
            .entry(infinitive.to_string())
            .or_insert_with(|| VerbDraft {
                entry: VerbEntry::with_slots(profile.slots.iter().cloned()),
                auxiliaries: Vec::new(),
            });
        draft.absorb_slots(profile, record);

        let Some(aux) = &profile.auxiliary else {
            return Ok(());
        };

        // Auxiliary before participle: the participle is appended to whatever
        // helper form the slot holds.
        if let Some(code) = record.get(&aux.key) {
            match aux
                .codes
                .get(code)
                .and_then(|name| aux.paradigms.iter().position(|p| &p.name == name))
            {
                Some(index) => draft.add_auxiliary(aux, index),
                None => warn!(position, infinitive, code, "unknown auxiliary code, ignoring"),
            }
        }

        if let Some(participle) = record.get(&aux.participle_key).filter(|p| !p.is_empty()) {
            draft.add_participle(aux, participle);
        }

        Ok(())
    }

    pub fn finish(self) -> BTreeMap<String, VerbEntry> {
        info!(
            records = self.observed,
            verbs = self.drafts.len(),
            "merged verb conjugations"
        );
        let renames = &self.profile.renames;
        self.drafts
            .into_iter()
            .map(|(infinitive, draft)| {
                let mut entry = draft.entry;
                for (from, to) in renames {
                    entry.rename(from, to);
                }
                (infinitive, entry)
            })
            .collect()
    }
}

impl VerbDraft {
    fn absorb_slots(&mut self, profile: &VerbProfile, record: &RawRecord) {
        let aux_key = profile.auxiliary.as_ref().map(|aux| aux.key.as_str());
        for slot in &profile.slots {
            if Some(slot.as_str()) == aux_key {
                continue;
            }
            if let Some(value) = record.get(slot)
                && let Some(current) = self.entry.get_mut(slot)
                && current.is_empty()
            {
                *current = value.to_string();
            }
        }
    }

    fn add_auxiliary(&mut self, aux: &AuxiliaryProfile, index: usize) {
        if self.auxiliaries.contains(&index) {
            return;
        }
        self.auxiliaries.push(index);
        self.auxiliaries.sort_unstable();

        let marker = self.joined(|i| aux.paradigms[i].name.as_str());
        self.entry.set(&aux.key, marker);
        for (n, slot) in aux.perfect_slots.iter().enumerate() {
            let forms = self.joined(|i| aux.paradigms[i].forms[n].as_str());
            self.entry.set(slot, forms);
        }
    }

    fn add_participle(&mut self, aux: &AuxiliaryProfile, participle: &str) {
        let suffix = format!(" {participle}");
        for slot in &aux.perfect_slots {
            let Some(current) = self.entry.get_mut(slot) else {
                continue;
            };
            if current.is_empty() || current.as_str() == participle {
                *current = participle.to_string();
            } else if !current.ends_with(&suffix) {
                current.push_str(&suffix);
            }
        }
    }

    fn joined<'a>(&self, pick: impl Fn(usize) -> &'a str) -> String {
        self.auxiliaries
            .iter()
            .map(|&i| pick(i))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Merge a full record sequence in input order.
pub fn merge_conjugations(
    records: &[RawRecord],
    profile: &VerbProfile,
) -> Result<BTreeMap<String, VerbEntry>, MalformedRecordError> {
    let mut merger = ConjugationMerger::new(profile);
    for (position, record) in records.iter().enumerate() {
        merger.observe(position, record)?;
    }
    Ok(merger.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LanguageProfile;

    fn german() -> VerbProfile {
        LanguageProfile::german().verbs.unwrap()
    }

    fn rec<const N: usize>(pairs: [(&str, &str); N]) -> RawRecord {
        RawRecord::from(pairs)
    }

    #[test]
    fn dual_auxiliary_joins_helper_forms() {
        let profile = german();
        let verbs = merge_conjugations(
            &[
                rec([("infinitive", "fahren"), ("auxiliaryVerb", "sein")]),
                rec([("infinitive", "fahren"), ("auxiliaryVerb", "haben")]),
                rec([("infinitive", "fahren"), ("pastParticiple", "gefahren")]),
            ],
            &profile,
        )
        .unwrap();
        let fahren = &verbs["fahren"];
        assert_eq!(fahren.get("perfFPS"), Some("bin/habe gefahren"));
        assert_eq!(fahren.get("perfTPS"), Some("ist/hat gefahren"));
        assert_eq!(fahren.get("perfSPP"), Some("seid/habt gefahren"));
        assert_eq!(fahren.get("auxiliaryVerb"), Some("sein/haben"));
        assert_eq!(fahren.get("pastParticiple"), Some("gefahren"));
    }

    #[test]
    fn dual_order_follows_paradigm_table() {
        let profile = german();
        let verbs = merge_conjugations(
            &[
                rec([("infinitive", "fahren"), ("auxiliaryVerb", "L4179")]),
                rec([("infinitive", "fahren"), ("auxiliaryVerb", "L1761")]),
            ],
            &profile,
        )
        .unwrap();
        assert_eq!(verbs["fahren"].get("perfFPS"), Some("bin/habe"));
        assert_eq!(verbs["fahren"].get("auxiliaryVerb"), Some("sein/haben"));
    }

    #[test]
    fn auxiliary_precedes_participle_within_a_record() {
        let profile = german();
        let verbs = merge_conjugations(
            &[rec([
                ("infinitive", "gehen"),
                ("auxiliaryVerb", "L1761"),
                ("pastParticiple", "gegangen"),
                ("presFPS", "gehe"),
            ])],
            &profile,
        )
        .unwrap();
        let gehen = &verbs["gehen"];
        assert_eq!(gehen.get("perfFPS"), Some("bin gegangen"));
        assert_eq!(gehen.get("perfTPP"), Some("sind gegangen"));
        assert_eq!(gehen.get("presFPS"), Some("gehe"));
        assert_eq!(gehen.get("presSPS"), Some(""));
        assert_eq!(gehen.get("auxiliaryVerb"), Some("sein"));
    }

    #[test]
    fn participle_without_auxiliary_stands_alone() {
        let profile = german();
        let verbs = merge_conjugations(
            &[
                rec([("infinitive", "machen"), ("pastParticiple", "gemacht")]),
                rec([("infinitive", "machen"), ("pastParticiple", "gemacht")]),
            ],
            &profile,
        )
        .unwrap();
        assert_eq!(verbs["machen"].get("perfFPS"), Some("gemacht"));
    }

    #[test]
    fn repeated_rows_do_not_duplicate_participles() {
        let profile = german();
        let verbs = merge_conjugations(
            &[
                rec([
                    ("infinitive", "machen"),
                    ("auxiliaryVerb", "L4179"),
                    ("pastParticiple", "gemacht"),
                ]),
                rec([
                    ("infinitive", "machen"),
                    ("auxiliaryVerb", "L4179"),
                    ("pastParticiple", "gemacht"),
                ]),
            ],
            &profile,
        )
        .unwrap();
        assert_eq!(verbs["machen"].get("perfSPS"), Some("hast gemacht"));
    }

    #[test]
    fn unknown_auxiliary_code_leaves_slots_alone() {
        let profile = german();
        let verbs = merge_conjugations(
            &[rec([("infinitive", "werden"), ("auxiliaryVerb", "L999")])],
            &profile,
        )
        .unwrap();
        let werden = &verbs["werden"];
        assert_eq!(werden.get("auxiliaryVerb"), Some(""));
        assert_eq!(werden.get("perfFPS"), Some(""));
    }

    #[test]
    fn later_rows_fill_only_empty_slots() {
        let profile = LanguageProfile::spanish().verbs.unwrap();
        let verbs = merge_conjugations(
            &[
                rec([("infinitive", "ser"), ("indicativePresentFPS", "soy")]),
                rec([
                    ("infinitive", "ser"),
                    ("indicativePresentFPS", "wrong"),
                    ("preteriteFPS", "fui"),
                    ("unrelated", "x"),
                ]),
            ],
            &profile,
        )
        .unwrap();
        let ser = &verbs["ser"];
        assert_eq!(ser.get("indicativePresentFPS"), Some("soy"));
        assert_eq!(ser.get("preteriteFPS"), Some("fui"));
        assert_eq!(ser.get("unrelated"), None);
        assert_eq!(ser.len(), 18);
    }

    #[test]
    fn french_renames_past_perfect_slots() {
        let profile = LanguageProfile::french().verbs.unwrap();
        let verbs = merge_conjugations(
            &[rec([("infinitive", "être"), ("pastPerfectFPS", "étais")])],
            &profile,
        )
        .unwrap();
        let etre = &verbs["être"];
        assert_eq!(etre.get("imperfectFPS"), Some("étais"));
        assert_eq!(etre.get("pastPerfectFPS"), None);
    }

    #[test]
    fn rows_without_infinitive_are_ignored_and_empty_ones_fail() {
        let profile = german();
        let verbs = merge_conjugations(&[rec([("presFPS", "bin")])], &profile).unwrap();
        assert!(verbs.is_empty());

        let err = merge_conjugations(
            &[rec([("infinitive", "sein")]), rec([("infinitive", "")])],
            &profile,
        )
        .unwrap_err();
        assert_eq!(err.position, 1);
    }
}
