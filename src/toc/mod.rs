//! Heading extraction and table-of-contents assembly.
//!
//! [`extract`] is a pure function of its input: it scans the text once,
//! sanitizes each heading title, assigns slugs from a registry that lives only
//! for the call, and folds the result into a two-level outline.

pub mod outline;
pub mod sanitize;
pub mod scanner;
pub mod slug;

use std::collections::BTreeSet;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use outline::{Counts, OutlineNode, render_markdown};
pub use scanner::HeadingKind;
pub use slug::Slugger;

const DEFAULT_TOP_LEVELS: [u8; 2] = [2, 3];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    pub level: u8,
    pub title: String,
    pub slug: String,
    pub source_offset: usize,
    pub kind: HeadingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Toc {
    pub headings: Vec<Heading>,
    pub outline: Vec<OutlineNode>,
    pub counts: Counts,
}

impl Toc {
    /// Outline anchors in preorder.
    pub fn anchors(&self) -> Vec<&str> {
        outline::anchors(&self.outline)
    }
}

/// Levels that make up the top of the outline. Only the smallest one
/// matters: it is the boundary between root entries and their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTocConfig")]
pub struct TocConfig {
    top_levels: BTreeSet<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTocConfig {
    top_levels: Option<Vec<u8>>,
}

impl TryFrom<RawTocConfig> for TocConfig {
    type Error = Error;

    fn try_from(raw: RawTocConfig) -> Result<Self> {
        match raw.top_levels {
            Some(levels) => Self::new(levels),
            None => Ok(Self::default()),
        }
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            top_levels: DEFAULT_TOP_LEVELS.into_iter().collect(),
        }
    }
}

impl TocConfig {
    pub fn new(levels: impl IntoIterator<Item = u8>) -> Result<Self> {
        let top_levels: BTreeSet<u8> = levels.into_iter().collect();
        if let Some(&bad) = top_levels.iter().find(|l| !(1..=6).contains(*l)) {
            return Err(Error::InvalidLevel(bad));
        }
        if top_levels.is_empty() {
            return Err(Error::EmptyLevels);
        }
        Ok(Self { top_levels })
    }

    pub fn top_levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.top_levels.iter().copied()
    }

    pub fn top_level(&self) -> u8 {
        self.top_levels
            .first()
            .copied()
            .unwrap_or(DEFAULT_TOP_LEVELS[0])
    }
}

pub fn extract(markdown: &str, config: &TocConfig) -> Toc {
    let mut slugger = Slugger::new();

    let headings: Vec<Heading> = scanner::scan(markdown)
        .into_iter()
        .map(|raw| {
            let title = sanitize::sanitize(&raw.text);
            let slug = slugger.slug(&title);
            Heading {
                level: raw.level,
                title,
                slug,
                source_offset: raw.offset,
                kind: raw.kind,
            }
        })
        .collect();

    let counts = Counts::tally(&headings);
    let outline = outline::build(&headings, config.top_level());

    debug!(
        "extracted {} headings into {} top-level entries (top level h{})",
        counts.total,
        outline.len(),
        config.top_level()
    );

    Toc {
        headings,
        outline,
        counts,
    }
}

/// Flat listing, one heading per line, prefixed by its source offset.
pub fn render_lines(headings: &[Heading]) -> String {
    let Some(last) = headings.last() else {
        return String::new();
    };

    let width = last.source_offset.to_string().len().max(3);

    headings
        .iter()
        .map(|h| {
            format!(
                "{:>width$}→{} {}",
                h.source_offset,
                "#".repeat(usize::from(h.level)),
                h.title,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
