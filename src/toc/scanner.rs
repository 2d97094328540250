//! Line scan for headings, no markdown parser needed.
//!
//! Recognizes ATX (`## Title`), Setext (underlined) and single-line
//! `<hN>` headings, skipping everything inside fenced code blocks.
//! Offsets count characters; every line separator is charged as one
//! character, whether it was written as `\n` or `\r\n`.

use log::trace;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HeadingKind {
    Atx,
    Setext,
    Html,
}

/// A heading occurrence before sanitizing and slugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeading {
    pub level: u8,
    pub text: String,
    pub offset: usize,
    pub kind: HeadingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
}

impl Fence {
    /// A line opens a fence when it starts with three or more backticks or
    /// tildes. A backtick info string may not contain backticks, so a
    /// one-line ```` ```code``` ```` span is not an opener.
    fn opening(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        for marker in ['`', '~'] {
            let run = trimmed.chars().take_while(|&c| c == marker).count();
            if run < 3 {
                continue;
            }
            let info = &trimmed[run..];
            if marker == '`' && info.contains('`') {
                return None;
            }
            return Some(Self { marker });
        }
        None
    }

    fn closes(self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.chars().count() >= 3 && trimmed.chars().all(|c| c == self.marker)
    }
}

pub fn scan(text: &str) -> Vec<RawHeading> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut headings = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut offset = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let width = line.chars().count() + 1;

        if let Some(open) = fence {
            if open.closes(line) {
                trace!("fence closed at line {}", i + 1);
                fence = None;
            }
            offset += width;
            i += 1;
            continue;
        }

        if let Some(open) = Fence::opening(line) {
            trace!("fence opened at line {}", i + 1);
            fence = Some(open);
            offset += width;
            i += 1;
            continue;
        }

        if let Some((level, title)) = atx(line) {
            headings.push(RawHeading {
                level,
                text: title.to_string(),
                offset,
                kind: HeadingKind::Atx,
            });
        } else if let Some(level) = lines.get(i + 1).and_then(|next| setext(line, next)) {
            headings.push(RawHeading {
                level,
                text: line.to_string(),
                offset,
                kind: HeadingKind::Setext,
            });
            // The underline belongs to the heading.
            offset += width;
            i += 1;
            let underline = lines[i].chars().count() + 1;
            offset += underline;
            i += 1;
            continue;
        } else if let Some((level, inner)) = html(line) {
            headings.push(RawHeading {
                level,
                text: inner.to_string(),
                offset,
                kind: HeadingKind::Html,
            });
        }

        offset += width;
        i += 1;
    }

    if fence.is_some() {
        trace!("unterminated fence swallowed the rest of the document");
    }

    headings
}

/// `#` run of length 1..=6 followed by whitespace. The optional closing
/// `#` sequence is dropped when whitespace separates it from the title.
#[allow(clippy::cast_possible_truncation)]
fn atx(line: &str) -> Option<(u8, &str)> {
    let rest = line.trim_start();
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }

    let after = &rest[hashes..];
    if !after.starts_with(char::is_whitespace) {
        return None;
    }

    Some((hashes as u8, strip_closing_hashes(after.trim())))
}

fn strip_closing_hashes(title: &str) -> &str {
    let without = title.trim_end_matches('#');
    if without.len() == title.len() {
        title
    } else if without.is_empty() {
        ""
    } else if without.ends_with(char::is_whitespace) {
        without.trim_end()
    } else {
        title
    }
}

/// Level of a Setext heading formed by `line` and its underline `next`.
fn setext(line: &str, next: &str) -> Option<u8> {
    if line.trim().is_empty() || is_thematic_break(line) {
        return None;
    }

    let underline = next.trim();
    if underline.is_empty() {
        None
    } else if underline.chars().all(|c| c == '=') {
        Some(1)
    } else if underline.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

/// `***`, `- - -`, `___` and friends can't carry a Setext underline.
fn is_thematic_break(line: &str) -> bool {
    let marks: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && matches!(marks[0], '*' | '-' | '_')
        && marks.iter().all(|&c| c == marks[0])
}

/// First complete `<hN ...>...</hN>` pair on the line, tag names matched
/// without regard to case.
fn html(line: &str) -> Option<(u8, &str)> {
    let lower = line.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut from = 0;

    while let Some(pos) = lower[from..].find("<h") {
        let start = from + pos;
        from = start + 2;

        let Some(&digit) = bytes.get(start + 2) else {
            break;
        };
        if !(b'1'..=b'6').contains(&digit) {
            continue;
        }
        let Some(gt) = lower[start + 3..].find('>') else {
            continue;
        };

        let inner_start = start + 3 + gt + 1;
        let close = format!("</h{}>", char::from(digit));
        if let Some(len) = lower[inner_start..].find(&close) {
            return Some((digit - b'0', &line[inner_start..inner_start + len]));
        }
    }

    None
}
