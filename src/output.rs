use std::collections::HashMap;

use anyhow::anyhow;
use biblatex::Bibliography;
use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use url::Url;

use crate::record::{ExtractionResult, PublicationRecord};

pub const SOURCE_NAME: &str = "google_scholar";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `{source, profile, count, items}` report
    #[default]
    Json,
    /// One `@misc` entry per publication
    Biblatex,
}

/// Render `result` for stdout.
pub fn render(
    result: &ExtractionResult,
    profile: &Url,
    format: Format,
    compact: bool,
) -> anyhow::Result<String> {
    match format {
        Format::Json => {
            let report = report(result, profile);
            let s = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            Ok(s)
        }
        Format::Biblatex => to_biblatex(result, profile),
    }
}

pub fn report(result: &ExtractionResult, profile: &Url) -> Value {
    json!({
        "source": SOURCE_NAME,
        "profile": profile.as_str(),
        "count": result.len(),
        "items": result.records().iter().map(PublicationRecord::to_json).collect::<Vec<_>>(),
    })
}

fn to_biblatex(result: &ExtractionResult, profile: &Url) -> anyhow::Result<String> {
    if result.is_empty() {
        return Ok(String::new());
    }
    let urldate = chrono::Utc::now().date_naive().to_string();
    let mut keys: HashMap<String, usize> = HashMap::new();
    let mut src = String::new();

    for rec in result.records() {
        let mut key = build_key(rec);
        let n = keys.entry(key.clone()).or_default();
        *n += 1;
        if *n > 1 {
            key = format!("{key}-{n}");
        }

        let mut fields: Vec<(&str, String)> = vec![("title", rec.title.clone())];
        let authors = split_authors(&rec.authors);
        if !authors.is_empty() {
            fields.push(("author", authors.join(" and ")));
        }
        if let Some(venue) = venue_of(rec) {
            fields.push(("howpublished", venue));
        }
        if let Some(year) = &rec.year {
            fields.push(("year", year.clone()));
        }
        fields.push(("urldate", urldate.clone()));

        src.push_str(&format!("@misc{{{key},\n"));
        for (name, value) in fields {
            src.push_str(&format!("  {name} = {{{}}},\n", escape_value(&value)));
        }
        // Verbatim field: only braces and backslashes are special, and URLs carry neither.
        src.push_str(&format!("  url = {{{}}},\n", profile.as_str()));
        src.push_str("}\n\n");
    }

    let bib = Bibliography::parse(&src).map_err(|e| anyhow!("failed to parse BibLaTeX: {e}"))?;
    Ok(bib.to_biblatex_string())
}

/// Names from a Scholar authors line such as `"Z Tighidet, B Piwowarski - arXiv preprint, 2024"`.
fn split_authors(line: &str) -> Vec<String> {
    let names = line.split_once(" - ").map_or(line, |(names, _)| names);
    names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty() && !n.chars().all(|c| c == '.' || c == '…'))
        .map(str::to_string)
        .collect()
}

fn venue_of(rec: &PublicationRecord) -> Option<String> {
    static TRAILING_YEAR_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r",?\s*\b(?:19|20)\d{2}\s*$").unwrap());

    let venue = if rec.venue.is_empty() {
        let (_, rest) = rec.authors.split_once(" - ")?;
        TRAILING_YEAR_RE.replace(rest, "").trim().to_string()
    } else {
        rec.venue.trim().to_string()
    };
    (!venue.is_empty()).then_some(venue)
}

fn build_key(rec: &PublicationRecord) -> String {
    const STOPWORDS: &[&str] = &["the", "with", "from", "into", "towards", "toward", "when", "what"];
    let word = rec
        .title
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .find(|w| w.chars().count() >= 4 && !STOPWORDS.contains(&w.as_str()))
        .unwrap_or_else(|| "untitled".to_string());
    let year = rec.year.as_deref().unwrap_or("nd");
    format!("scholar:{year}:{word}")
}

/// Backslash-escape the characters BibLaTeX reserves in ordinary fields. `~` and `^` are left
/// alone since `\~` and `\^` read back as accent commands.
fn escape_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '{' | '}' | '#' | '&' | '%' | '$' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract::extract, page::RawPage};
    use biblatex::ChunksExt;

    fn sample() -> ExtractionResult {
        extract(&RawPage::from_lines([
            "Understanding Knowledge Conflicts in Large Language Models",
            "Z Tighidet, B Piwowarski - arXiv preprint, 2024",
            "Cited by 3",
            "Understanding Retrieval in Dense Passage Models",
            "A Author, B Author, ...",
            "Proceedings of the Workshop - ACL",
        ]))
    }

    fn profile() -> Url {
        Url::parse("https://scholar.google.com/citations?user=jgle1SAAAAAJ&hl=en").unwrap()
    }

    #[test]
    fn json_report_has_expected_shape_and_order() {
        let out = render(&sample(), &profile(), Format::Json, true).unwrap();
        assert!(out.starts_with(
            r#"{"source":"google_scholar","profile":"https://scholar.google.com/citations?user=jgle1SAAAAAJ&hl=en","count":2,"items":[{"title":"Understanding Knowledge Conflicts"#
        ));
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["items"][0]["year"], "2024");
        assert!(v["items"][1]["year"].is_null());
        assert_eq!(v["items"][1]["venue"], "Proceedings of the Workshop - ACL");
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let out = render(&ExtractionResult::default(), &profile(), Format::Json, false).unwrap();
        assert!(out.contains("\n  \"source\": \"google_scholar\""));
        assert!(out.contains("\"count\": 0"));
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let res = extract(&RawPage::from_lines(["Évaluation des modèles de langue à grande échelle"]));
        let out = render(&res, &profile(), Format::Json, true).unwrap();
        assert!(out.contains("Évaluation des modèles"));
    }

    #[test]
    fn split_authors_drops_venue_and_ellipsis() {
        assert_eq!(
            split_authors("Z Tighidet, B Piwowarski - arXiv preprint, 2024"),
            ["Z Tighidet", "B Piwowarski"]
        );
        assert_eq!(split_authors("A Author, B Author, ..."), ["A Author", "B Author"]);
        assert_eq!(split_authors("A Author, …"), ["A Author"]);
        assert!(split_authors("").is_empty());
    }

    #[test]
    fn venue_falls_back_to_authors_line_without_year() {
        let recs = sample();
        assert_eq!(venue_of(&recs.records()[0]).as_deref(), Some("arXiv preprint"));
        assert_eq!(
            venue_of(&recs.records()[1]).as_deref(),
            Some("Proceedings of the Workshop - ACL")
        );
    }

    #[test]
    fn keys_are_unique_within_a_run() {
        let out = render(&sample(), &profile(), Format::Biblatex, false).unwrap();
        let bib = Bibliography::parse(&out).unwrap();
        assert!(bib.get("scholar:2024:understanding").is_some());
        assert!(bib.get("scholar:nd:understanding").is_some());

        let dup = extract(&RawPage::from_lines([
            "Understanding Knowledge Conflicts in Large Language Models",
            "Z Tighidet - arXiv, 2024",
            "x",
            "Understanding Knowledge Editing in Large Language Models",
            "Z Tighidet - arXiv, 2024",
        ]));
        let out = render(&dup, &profile(), Format::Biblatex, false).unwrap();
        let bib = Bibliography::parse(&out).unwrap();
        assert!(bib.get("scholar:2024:understanding").is_some());
        assert!(bib.get("scholar:2024:understanding-2").is_some());
    }

    #[test]
    fn biblatex_entry_carries_authors_and_url() {
        let out = render(&sample(), &profile(), Format::Biblatex, false).unwrap();
        let bib = Bibliography::parse(&out).unwrap();
        let entry = bib.get("scholar:2024:understanding").unwrap();
        assert_eq!(entry.author().unwrap().len(), 2);
        assert!(out.contains("scholar.google.com/citations"));
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(escape_value("a {b} c"), "a \\{b\\} c");
        assert_eq!(escape_value("50% fewer"), "50\\% fewer");
        assert_eq!(escape_value(r"C:\ in"), r"C:\\ in");
        assert_eq!(escape_value("a_b & $c"), r"a\_b \& \$c");
    }

    #[test]
    fn title_with_reserved_characters_reads_back_unchanged() {
        let title = r"A Study of Path Separators like C:\ in Windows & 100% of {braced} $5 cases_x";
        let res = extract(&RawPage::from_lines([title]));
        let out = render(&res, &profile(), Format::Biblatex, false).unwrap();
        let bib = Bibliography::parse(&out).unwrap();
        let entry = bib.get("scholar:nd:study").unwrap();
        assert_eq!(entry.title().unwrap().format_verbatim(), title);
        assert!(out.contains("user=jgle1SAAAAAJ&hl=en"), "out=\n{out}");
    }

    #[test]
    fn empty_result_renders_no_entries() {
        let out = render(&ExtractionResult::default(), &profile(), Format::Biblatex, false).unwrap();
        assert!(out.is_empty());
    }
}
