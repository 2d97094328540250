//! GitHub-style heading slugs.
//!
//! A slug keeps Unicode letters, marks, numbers, `-` and `_`, drops every
//! other symbol or punctuation character, and joins words with `-`.
//! Renderers must use the same function for heading ids so that TOC anchors
//! resolve.

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;

/// Slugs a single title without collision tracking.
pub fn slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut gap = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            gap = true;
            continue;
        }
        if !is_retained(c) {
            continue;
        }
        if gap && !out.is_empty() {
            out.push('-');
        }
        gap = false;
        out.push(c);
    }

    out.trim_matches('-').to_string()
}

fn is_retained(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c) || c == '-' || c == '_'
}

/// Issues unique slugs for one document.
///
/// The second occurrence of `overview` becomes `overview-1`, the third
/// `overview-2`. A suffixed candidate that collides with a slug already
/// issued verbatim keeps counting until it is free.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(&mut self, title: &str) -> String {
        let base = slug(title);
        let mut candidate = base.clone();

        while self.occurrences.contains_key(&candidate) {
            let counter = self.occurrences.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{base}-{counter}");
        }

        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }

    pub fn reset(&mut self) {
        self.occurrences.clear();
    }
}
