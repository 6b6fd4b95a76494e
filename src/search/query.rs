use itertools::Itertools;
use smallvec::SmallVec;

use crate::model::Searchable;

/// Whitespace-separated search terms. Most admin searches are one or two words.
pub type Terms = SmallVec<[String; 4]>;

/// A query after trimming and lower-casing, with its terms split out.
///
/// The normalized text doubles as the search cache key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedQuery {
    key: String,
    terms: Terms,
}

impl NormalizedQuery {
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_lowercase();
        let terms = key.split_whitespace().map(str::to_string).collect();
        Self { key, terms }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// True when this query textually extends `previous`, so its matches are a subset
    /// of the previous query's matches.
    pub fn extends(&self, previous: &str) -> bool {
        !previous.is_empty() && self.key.starts_with(previous)
    }

    /// Every term must occur somewhere in the joined field text.
    pub fn matches<R, S>(&self, record: &R, fields: &[S]) -> bool
    where
        R: Searchable + ?Sized,
        S: AsRef<str>,
    {
        let text = haystack(record, fields);
        self.terms.iter().all(|term| text.contains(term.as_str()))
    }
}

/// Lower-cased field values joined by single spaces, in the order the fields were
/// requested. Absent fields contribute an empty string.
pub fn haystack<R, S>(record: &R, fields: &[S]) -> String
where
    R: Searchable + ?Sized,
    S: AsRef<str>,
{
    fields
        .iter()
        .map(|field| {
            record
                .field_text(field.as_ref())
                .map(|text| text.to_lowercase())
                .unwrap_or_default()
        })
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn parse_trims_lowercases_and_splits() {
        let q = NormalizedQuery::parse("  Alpha   BETA\tgamma ");
        assert_eq!(q.key(), "alpha   beta\tgamma");
        assert_eq!(q.terms(), ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(NormalizedQuery::parse(" \t\n").is_empty());
        assert!(NormalizedQuery::parse("").terms().is_empty());
    }

    #[test]
    fn extends_requires_non_empty_prefix() {
        let q = NormalizedQuery::parse("alpha o");
        assert!(q.extends("alpha"));
        assert!(q.extends("alpha o"));
        assert!(!q.extends(""));
        assert!(!q.extends("beta"));
    }

    #[test]
    fn all_terms_must_match_in_any_order() {
        let record = Record::new()
            .with("title", "Tafsir Basics")
            .with("description", "Intro course");
        let fields = ["title", "description"];
        assert!(NormalizedQuery::parse("intro tafsir").matches(&record, &fields));
        assert!(NormalizedQuery::parse("BASICS").matches(&record, &fields));
        assert!(!NormalizedQuery::parse("tafsir advanced").matches(&record, &fields));
    }

    #[test]
    fn only_requested_fields_are_searched() {
        let record = Record::new().with("title", "Fiqh").with("slug", "hidden");
        assert!(!NormalizedQuery::parse("hidden").matches(&record, &["title"]));
    }

    #[test]
    fn haystack_uses_empty_string_for_absent_fields() {
        let record = Record::new().with("a", "X").with("c", 3);
        assert_eq!(haystack(&record, &["a", "b", "c"]), "x  3");
    }

    #[test]
    fn terms_do_not_join_adjacent_fields() {
        let record = Record::new().with("first", "ramadan").with("second", "kareem");
        assert!(!NormalizedQuery::parse("nk").matches(&record, &["first", "second"]));
        assert!(NormalizedQuery::parse("dan kar").matches(&record, &["second", "first"]));
    }
}
