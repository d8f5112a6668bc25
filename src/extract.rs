use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    page::RawPage,
    record::{ExtractionResult, PublicationRecord},
};

/// Phrases from Scholar's anti-automation interstitial. Matched case-insensitively.
const BOT_PROTECTION_PHRASES: &[&str] = &["automated queries", "protect our users", "unusual traffic"];

/// Page chrome that precedes the publication list and must never be read as a title.
const CHROME_PREFIXES: &[&str] = &[
    "my profile",
    "articles",
    "cited by",
    "co-authors",
    "public access",
];

/// Artifact line emitted by the text-rendering proxy.
const PROXY_MARKER: &str = "URL Source:";

/// A line must be longer than this to be considered as a title at all.
const CANDIDATE_MIN_CHARS: usize = 20;
/// Titles shorter than this are dropped after the scan.
const TITLE_MIN_CHARS: usize = 25;
/// Metadata lines at or above this length are never authors or venue.
const META_MAX_CHARS: usize = 200;
/// Number of lines after a title inspected as metadata, and skipped afterwards.
const META_WINDOW: usize = 3;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2}|19\d{2})\b").unwrap());

/// Whether the page is Scholar's bot-protection interstitial rather than real content.
pub fn is_bot_protected(page: &RawPage) -> bool {
    let text = page.text().to_lowercase();
    BOT_PROTECTION_PHRASES.iter().any(|p| text.contains(p))
}

/// Extract candidate publications from a scraped profile listing.
///
/// This is a fixed-window heuristic tuned against the proxy's rendering of the "list works"
/// view: every long line that is not page chrome is a title, and the next three lines are
/// searched for a year, an authors line and a venue line. The scan then jumps three lines
/// ahead whether or not the window held any metadata.
///
/// Never fails; a page with nothing recognisable yields an empty result.
pub fn extract(page: &RawPage) -> ExtractionResult {
    if is_bot_protected(page) {
        return ExtractionResult::default();
    }
    let candidates = scan(page.lines());
    ExtractionResult::new(clean(candidates))
}

fn scan(lines: &[String]) -> Vec<PublicationRecord> {
    let mut pubs = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        if !is_candidate_title(line) {
            i += 1;
            continue;
        }

        let mut authors: Option<&str> = None;
        let mut venue: Option<&str> = None;
        let mut year: Option<&str> = None;
        for meta in lines.iter().skip(i + 1).take(META_WINDOW) {
            if year.is_none() {
                year = YEAR_RE.captures(meta).and_then(|c| c.get(1)).map(|m| m.as_str());
            }
            let short = meta.chars().count() < META_MAX_CHARS;
            let dashed = meta.contains(" - ");
            if short && (dashed || meta.contains(',')) {
                if authors.is_none() {
                    authors = Some(meta);
                } else if venue.is_none() && dashed {
                    venue = Some(meta);
                }
            }
        }

        pubs.push(PublicationRecord {
            title: line.clone(),
            authors: authors.unwrap_or_default().to_string(),
            venue: venue.unwrap_or_default().to_string(),
            year: year.map(str::to_string),
        });
        i += META_WINDOW;
    }
    pubs
}

fn is_candidate_title(line: &str) -> bool {
    if line.chars().count() <= CANDIDATE_MIN_CHARS {
        return false;
    }
    let lower = line.to_lowercase();
    !CHROME_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Drop repeated titles (case-insensitive, first wins), short titles and proxy artifacts.
fn clean(pubs: Vec<PublicationRecord>) -> Vec<PublicationRecord> {
    let mut seen = HashSet::new();
    pubs.into_iter()
        .filter(|p| seen.insert(p.title.to_lowercase()))
        .filter(|p| p.title.chars().count() >= TITLE_MIN_CHARS)
        .filter(|p| !p.title.starts_with(PROXY_MARKER))
        .take(ExtractionResult::MAX_ITEMS)
        .collect()
}
