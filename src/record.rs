use serde_json::{Value, json};

/// One candidate publication scraped from a profile listing.
///
/// Records have no identity beyond their title, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRecord {
    pub title: String,
    /// Raw authors line; may also carry the venue and year after a `" - "`.
    pub authors: String,
    pub venue: String,
    /// Four-digit year, when one was found near the title.
    pub year: Option<String>,
}

impl PublicationRecord {
    pub fn to_json(&self) -> Value {
        json!({
            "title": self.title,
            "authors": self.authors,
            "venue": self.venue,
            "year": self.year,
        })
    }
}

/// The terminal output of an extraction: at most [`ExtractionResult::MAX_ITEMS`] records with
/// unique titles, in the order they were first seen on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    records: Vec<PublicationRecord>,
}

impl ExtractionResult {
    pub const MAX_ITEMS: usize = 8;

    pub(crate) fn new(mut records: Vec<PublicationRecord>) -> Self {
        records.truncate(Self::MAX_ITEMS);
        ExtractionResult { records }
    }

    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
