use std::collections::{BTreeSet, HashSet};

/// Rewrites compound annotations (`"PL/M/F/PL"`) into their canonical form
/// (`"F/M/PL"`).
///
/// Single-tag literals of the configured alphabet are returned untouched, so a
/// multi-character tag is never split. Everything else is split on `/`,
/// stripped of empty segments, deduplicated and sorted by code point.
#[derive(Clone, Debug, Default)]
pub struct AnnotationNormalizer {
    single_tags: HashSet<String>,
}

impl AnnotationNormalizer {
    pub fn new<I, S>(single_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            single_tags: single_tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn normalize(&self, annotation: &str) -> String {
        if self.single_tags.contains(annotation) {
            return annotation.to_string();
        }

        let tags: BTreeSet<&str> = annotation.split('/').filter(|t| !t.is_empty()).collect();
        tags.into_iter().collect::<Vec<_>>().join("/")
    }
}
