//! Cross-checks the engine against an independent heading extractor.
//!
//! Reference headings come from `pulldown-cmark`, are slugged by a fresh
//! [`Slugger`] and compared in order with what [`extract`] produced. Any
//! disagreement means a rendered heading id and a TOC link could drift apart.

use std::fmt;

use log::{debug, warn};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::toc::{HeadingKind, Slugger, Toc, TocConfig, extract};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceHeading {
    pub level: u8,
    pub line_number: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mismatch {
    Count { expected: usize, found: usize },
    Title { line: usize, expected: String, found: String },
    Slug { index: usize, expected: String, found: String },
    Anchor { index: usize, expected: String, found: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count { expected, found } => {
                write!(f, "heading count: expected {expected}, found {found}")
            }
            Self::Title {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected title {expected:?}, found {found:?}"),
            Self::Slug {
                index,
                expected,
                found,
            } => write!(f, "heading {index}: expected slug {expected:?}, found {found:?}"),
            Self::Anchor {
                index,
                expected,
                found,
            } => write!(f, "outline entry {index}: expected {expected:?}, found {found:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn into_result(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(Error::Regression {
                count: self.mismatches.len(),
            })
        }
    }
}

pub fn verify(markdown: &str, config: &TocConfig) -> Report {
    let toc = extract(markdown, config);
    let reference = reference_headings(markdown);
    let mut mismatches = Vec::new();

    let markdown_headings: Vec<_> = toc
        .headings
        .iter()
        .filter(|h| h.kind != HeadingKind::Html)
        .collect();

    if reference.len() != markdown_headings.len() {
        mismatches.push(Mismatch::Count {
            expected: reference.len(),
            found: markdown_headings.len(),
        });
    }

    for (expected, found) in reference.iter().zip(&markdown_headings) {
        if expected.title != found.title {
            mismatches.push(Mismatch::Title {
                line: expected.line_number,
                expected: expected.title.clone(),
                found: found.title.clone(),
            });
        }
    }

    // HTML headings draw from the same slug registry but are invisible to the
    // reference parser, so with any present the engine's own titles are used.
    let titles: Vec<&str> = if markdown_headings.len() == toc.headings.len() {
        reference.iter().map(|h| h.title.as_str()).collect()
    } else {
        toc.headings.iter().map(|h| h.title.as_str()).collect()
    };
    mismatches.extend(slug_mismatches(&titles, &toc));
    mismatches.extend(anchor_mismatches(&toc));

    for mismatch in &mismatches {
        warn!("slug regression: {mismatch}");
    }
    debug!(
        "checked {} headings, {} mismatches",
        toc.headings.len(),
        mismatches.len()
    );

    Report {
        checked: toc.headings.len(),
        mismatches,
    }
}

fn slug_mismatches(titles: &[&str], toc: &Toc) -> Vec<Mismatch> {
    let mut slugger = Slugger::new();
    titles
        .iter()
        .map(|title| slugger.slug(title))
        .zip(&toc.headings)
        .enumerate()
        .filter(|(_, (expected, heading))| *expected != heading.slug)
        .map(|(index, (expected, heading))| Mismatch::Slug {
            index,
            expected,
            found: heading.slug.clone(),
        })
        .collect()
}

/// Every heading must show up in the outline, in source order.
fn anchor_mismatches(toc: &Toc) -> Vec<Mismatch> {
    let expected: Vec<String> = toc.headings.iter().map(|h| format!("#{}", h.slug)).collect();
    let found = toc.anchors();

    (0..expected.len().max(found.len()))
        .filter_map(|index| {
            let want = expected.get(index).map_or("", String::as_str);
            let got = found.get(index).copied().unwrap_or("");
            (want != got).then(|| Mismatch::Anchor {
                index,
                expected: want.to_string(),
                found: got.to_string(),
            })
        })
        .collect()
}

/// Headings as a CommonMark parser sees them, with inline markup reduced
/// to its text.
pub fn reference_headings(markdown: &str) -> Vec<ReferenceHeading> {
    let mut headings = Vec::new();
    let mut current_heading: Option<(usize, HeadingLevel)> = None;
    let mut text_buffer = String::new();
    let line_tracker = LineTracker::new(markdown);

    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(markdown, options).into_offset_iter();

    for (event, range) in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let line_num = line_tracker.line_at_offset(range.start);
                current_heading = Some((line_num, level));
                text_buffer.clear();
            }
            Event::Text(text) | Event::Code(text) if current_heading.is_some() => {
                text_buffer.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if current_heading.is_some() => {
                text_buffer.push(' ');
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((line_number, level)) = current_heading.take() {
                    headings.push(ReferenceHeading {
                        level: heading_level_to_u8(level),
                        line_number,
                        title: text_buffer.trim().to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

struct LineTracker {
    line_offsets: Vec<usize>,
}

impl LineTracker {
    fn new(text: &str) -> Self {
        let mut offsets = vec![0];
        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                offsets.push(i + 1);
            }
        }
        Self {
            line_offsets: offsets,
        }
    }

    fn line_at_offset(&self, offset: usize) -> usize {
        match self.line_offsets.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(md: &str) -> Report {
        verify(md, &TocConfig::default())
    }

    #[test]
    fn test_duplicate_titles_pass() {
        let md = "## Hello **world**\n## Hello world\n# Title\n\n## Hello **world**\n\n### Subheading";
        let report = check(md);
        assert!(report.is_ok(), "{:?}", report.mismatches);
        assert_eq!(report.checked, 5);
    }

    #[test]
    fn test_setext_fence_and_inline_markup_pass() {
        let md = "Guide\n=====\n\n```\n# not a heading\n```\n\n## Use `cargo build`\n\n## [Links](url) and ~~old~~ *stuff*\n";
        assert!(check(md).is_ok());
    }

    #[test]
    fn test_html_headings_pass() {
        let md = "## Setup\n\n<h2>Setup</h2>\n\n## Setup\n";
        let report = check(md);
        assert!(report.is_ok(), "{:?}", report.mismatches);
        assert_eq!(report.checked, 3);
    }

    #[test]
    fn test_empty_document_passes() {
        let report = check("");
        assert!(report.is_ok());
        assert_eq!(report.checked, 0);
    }

    #[test]
    fn test_indented_code_is_reported() {
        let report = check("# Real\n\n    # Indented code\n");
        assert_eq!(
            report.mismatches[0],
            Mismatch::Count {
                expected: 1,
                found: 2
            }
        );
        assert!(matches!(report.into_result(), Err(Error::Regression { .. })));
    }

    #[test]
    fn test_escaped_markup_is_reported() {
        let report = check("## 2 \\* 3");
        assert_eq!(
            report.mismatches[0],
            Mismatch::Title {
                line: 1,
                expected: "2 * 3".to_string(),
                found: "2 \\ 3".to_string(),
            }
        );
    }

    #[test]
    fn test_reference_line_numbers() {
        let headings = reference_headings("# A\n\ntext\n\n## B");
        let lines: Vec<usize> = headings.iter().map(|h| h.line_number).collect();
        assert_eq!(lines, vec![1, 5]);
        assert_eq!(headings[1].level, 2);
    }

    #[test]
    fn test_mismatch_display() {
        let mismatch = Mismatch::Slug {
            index: 2,
            expected: "a-1".to_string(),
            found: "a".to_string(),
        };
        assert_eq!(mismatch.to_string(), r#"heading 2: expected slug "a-1", found "a""#);
    }

    #[test]
    fn test_line_tracker() {
        let tracker = LineTracker::new("a\nbb\nccc");
        assert_eq!(tracker.line_at_offset(0), 1);
        assert_eq!(tracker.line_at_offset(2), 2);
        assert_eq!(tracker.line_at_offset(3), 2);
        assert_eq!(tracker.line_at_offset(5), 3);
    }
}
