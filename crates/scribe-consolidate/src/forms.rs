use std::collections::BTreeMap;

use scribe_types::{LexicalEntry, NounRecord, PLURAL_TAG, Plural, RawRecord};
use tracing::{debug, info};

use crate::error::{MalformedReason, MalformedRecordError};
use crate::normalize::AnnotationNormalizer;
use crate::profile::NounProfile;

/// Merges noun observations into one entry per surface form.
///
/// Observations only ever add information: tags accumulate, and a plural
/// field is only replaced by a more informative one
/// (`Unknown < IsPlural < NoPlural < named`). Between two different named
/// plurals the first one observed is kept. Every plural mentioned by any
/// record ends up as an entry carrying the `PL` tag.
pub struct FormConsolidator<'p> {
    profile: &'p NounProfile,
    entries: BTreeMap<String, LexicalEntry>,
    observed: usize,
}

/// The number/gender attributes of one record, resolved against the profile.
struct Observation<'r, 'p> {
    singular: Option<&'r str>,
    plural: Option<&'r str>,
    gender_attested: bool,
    gender_tag: Option<&'p str>,
}

impl<'p> FormConsolidator<'p> {
    pub fn new(profile: &'p NounProfile) -> Self {
        Self {
            profile,
            entries: BTreeMap::new(),
            observed: 0,
        }
    }

    /// Absorb one record. `position` is only used for error reporting.
    ///
    /// The record is validated before anything is mutated.
    pub fn observe(
        &mut self,
        position: usize,
        record: &RawRecord,
    ) -> Result<(), MalformedRecordError> {
        let Some(obs) = self.resolve(position, record)? else {
            debug!(position, "record has no singular or plural, ignoring");
            return Ok(());
        };
        self.observed += 1;

        match (obs.singular, obs.plural) {
            (Some(singular), plural) => self.apply_singular(singular, plural, &obs),
            (None, Some(plural)) => self.mark_plural(plural),
            (None, None) => {}
        }
        Ok(())
    }

    /// Hand out the finished mapping; partial states are never observable.
    pub fn finish(self) -> BTreeMap<String, LexicalEntry> {
        info!(
            records = self.observed,
            entries = self.entries.len(),
            "consolidated noun forms"
        );
        self.entries
    }

    fn resolve<'r>(
        &self,
        position: usize,
        record: &'r RawRecord,
    ) -> Result<Option<Observation<'r, 'p>>, MalformedRecordError> {
        let keys = &self.profile.number_keys;
        let (singular, plural) =
            if let Some(pair) = keys.iter().find(|k| record.contains(&k.singular)) {
                (
                    non_empty(position, record, &pair.singular)?,
                    non_empty(position, record, &pair.plural)?,
                )
            } else if let Some(pair) = keys.iter().find(|k| record.contains(&k.plural)) {
                (None, non_empty(position, record, &pair.plural)?)
            } else {
                return Ok(None);
            };

        let profile = self.profile;
        let raw_gender = record.get(&profile.gender_key);
        let gender_tag = raw_gender.and_then(|g| profile.genders.get(g).map(String::as_str));
        if let Some(g) = raw_gender
            && gender_tag.is_none()
        {
            debug!(position, gender = g, "unmapped gender, no tag added");
        }

        Ok(Some(Observation {
            singular,
            plural,
            gender_attested: raw_gender.is_some(),
            gender_tag,
        }))
    }

    fn apply_singular(&mut self, singular: &str, plural: Option<&str>, obs: &Observation<'_, '_>) {
        let incoming = match plural {
            Some(p) if p == singular => Plural::SelfReferential(p.to_string()),
            Some(p) => Plural::Named(p.to_string()),
            None if obs.gender_attested => Plural::NoPlural,
            None => Plural::Unknown,
        };

        let entry = self.entries.entry(singular.to_string()).or_default();
        merge_plural(singular, &mut entry.plural, incoming);
        match obs.gender_tag {
            Some(tag) => entry.form.add_tag(tag),
            None if plural.is_some() && !obs.gender_attested => entry.form.mark_no_gender(),
            None => {}
        }

        if plural == Some(singular) {
            entry.form.add_tag(PLURAL_TAG);
        }
        if let Some(p) = plural
            && p != singular
        {
            self.mark_plural(p);
        }
    }

    /// Ensure `plural` exists as an entry and carries `PL`.
    fn mark_plural(&mut self, plural: &str) {
        let entry = self.entries.entry(plural.to_string()).or_default();
        merge_plural(plural, &mut entry.plural, Plural::IsPlural);
        entry.form.add_tag(PLURAL_TAG);
    }
}

fn merge_plural(surface: &str, current: &mut Plural, incoming: Plural) {
    if incoming.rank() > current.rank() {
        *current = incoming;
    } else if incoming.rank() == current.rank()
        && *current != incoming
        && current.surface().is_some()
    {
        debug!(
            surface,
            kept = current.as_output(),
            ignored = incoming.as_output(),
            "conflicting plurals, keeping the first"
        );
    }
}

fn non_empty<'r>(
    position: usize,
    record: &'r RawRecord,
    key: &str,
) -> Result<Option<&'r str>, MalformedRecordError> {
    match record.get(key) {
        Some("") => Err(MalformedRecordError::new(
            position,
            MalformedReason::EmptyValue { key: key.to_string() },
        )),
        other => Ok(other),
    }
}

/// Consolidate a full record sequence in input order.
pub fn consolidate(
    records: &[RawRecord],
    profile: &NounProfile,
) -> Result<BTreeMap<String, LexicalEntry>, MalformedRecordError> {
    let mut consolidator = FormConsolidator::new(profile);
    for (position, record) in records.iter().enumerate() {
        consolidator.observe(position, record)?;
    }
    Ok(consolidator.finish())
}

/// Render consolidated entries into their output shape with normalized forms.
pub fn render_nouns(
    entries: &BTreeMap<String, LexicalEntry>,
    profile: &NounProfile,
) -> BTreeMap<String, NounRecord> {
    let normalizer = AnnotationNormalizer::new(profile.single_tags.iter().cloned());
    entries
        .iter()
        .map(|(surface, entry)| {
            let mut record =
                entry.to_record(&profile.no_gender_sentinel, &profile.no_plural_sentinel);
            record.form = normalizer.normalize(&record.form);
            (surface.clone(), record)
        })
        .collect()
}
