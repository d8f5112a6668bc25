/// The decoded text of a scraped profile page, as the ordered list of its non-empty,
/// whitespace-trimmed lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    lines: Vec<String>,
}

impl RawPage {
    /// Decode fetched bytes as UTF-8, dropping any invalid sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text: String = bytes.utf8_chunks().map(|c| c.valid()).collect();
        Self::from_text(&text)
    }

    /// Split on every Unicode line boundary, not only `\n`. A `\r\n` pair yields an empty
    /// line in between, which is dropped with the other blank lines.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split(is_line_break))
    }

    /// Build a page from pre-split lines. Lines are trimmed and blank ones dropped, so the
    /// result is the same whether the caller hands over raw or cleaned lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .filter_map(|l| {
                let l = l.as_ref().trim_matches(is_blank);
                (!l.is_empty()).then(|| l.to_string())
            })
            .collect();
        RawPage { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Full page text, one line per row.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Whitespace for trimming; the ASCII separators `\x1c`..`\x1f` count as blank too.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}
