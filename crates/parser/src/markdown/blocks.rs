//! Line classification for the markdown reader

use regex::Regex;
use std::sync::LazyLock;

// 1) hashes, 2) heading text without an optional closing sequence
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("invalid regex")
});

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?\s*$").expect("invalid regex")
});

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("invalid regex"));

/// Parse an ATX heading line into `(level, text)`
pub fn heading(line: &str) -> Option<(u8, String)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    Some((level, clean_inline(text)))
}

/// Table delimiter row such as `|---|:---:|`
pub fn is_delimiter_row(line: &str) -> bool {
    line.contains('-') && DELIMITER_RE.is_match(line)
}

/// Opening fence marker (the run of backticks or tildes), if any
pub fn fence(line: &str) -> Option<&str> {
    FENCE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A line that can open or continue a pipe table
pub fn is_table_line(line: &str) -> bool {
    line.contains('|')
}

/// Split a pipe-table row into trimmed cell texts.
///
/// Leading and trailing pipes are optional; `\|` is a literal pipe.
pub fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);

    if line.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }
    if line.len() > 1 && line.ends_with('|') && !line.ends_with("\\|") {
        cells.pop();
    }

    cells.iter().map(|cell| clean_inline(cell)).collect()
}

/// Strip code spans and strong emphasis markers, keeping the text
pub fn clean_inline(text: &str) -> String {
    text.replace("**", "").replace('`', "").trim().to_string()
}
