use regex::Regex;
use std::sync::LazyLock;

use crate::playlist::Song;

/// Number of songs we ask for and the most we ever return.
pub const SONG_COUNT: usize = 5;

// "1.", "2)", "- ", "* ", "• " at the start of a line.
static ENUMERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+\s*[.)]|[-*•]\s)\s*").expect("valid regex"));

// A hyphen, en dash or em dash with whitespace on both sides.
static DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—]\s+").expect("valid regex"));

/// Extract up to `SONG_COUNT` songs from free text with one
/// "Title - Artist" entry per line. Lines that don't look like an entry
/// are skipped.
pub fn parse_songs(text: &str) -> Vec<Song> {
    text.lines()
        .filter_map(parse_line)
        .take(SONG_COUNT)
        .collect()
}

fn parse_line(line: &str) -> Option<Song> {
    let line = line.trim();
    // Empty lines and preambles such as "Sure - here are five songs:"
    if line.is_empty() || line.ends_with(':') {
        return None;
    }

    let line = ENUMERATION.replace(line, "");
    let (mut title, mut artist) = split_entry(&line)?;

    // "1 - Title - Artist": the number is a list marker, not the title.
    if is_number(title) {
        if let Some(entry) = split_entry(artist) {
            (title, artist) = entry;
        }
    }

    let title = clean_title(title);
    let artist = artist.trim();
    if title.is_empty() || artist.is_empty() {
        return None;
    }

    Some(Song::new(title, artist))
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut fields = DELIMITER.splitn(line, 2);
    let head = fields.next()?;
    let rest = fields.next()?;
    Some((head, rest))
}

fn is_number(field: &str) -> bool {
    let field = field.trim();
    !field.is_empty() && field.chars().all(|c| c.is_ascii_digit())
}

fn clean_title(title: &str) -> &str {
    title
        .trim()
        .trim_matches(|c: char| c == '"' || c == '“' || c == '”')
        .trim()
}
