use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Heading;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutlineNode {
    pub title: String,
    pub anchor: String,
    pub children: Vec<OutlineNode>,
}

impl From<&Heading> for OutlineNode {
    fn from(heading: &Heading) -> Self {
        Self {
            title: heading.title.clone(),
            anchor: format!("#{}", heading.slug),
            children: Vec::new(),
        }
    }
}

/// Per-document heading tally. `h1 + ... + h6 == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Counts {
    pub total: usize,
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

impl Counts {
    pub fn tally(headings: &[Heading]) -> Self {
        let mut by_level = [0usize; 6];
        for heading in headings {
            let slot = heading.level.checked_sub(1).map(usize::from);
            if let Some(count) = slot.and_then(|i| by_level.get_mut(i)) {
                *count += 1;
            }
        }

        let [h1, h2, h3, h4, h5, h6] = by_level;
        Self {
            total: headings.len(),
            h1,
            h2,
            h3,
            h4,
            h5,
            h6,
        }
    }

    /// Count for one level; levels outside 1..=6 count zero.
    pub fn get(&self, level: u8) -> usize {
        let table = [self.h1, self.h2, self.h3, self.h4, self.h5, self.h6];
        level
            .checked_sub(1)
            .and_then(|i| table.get(usize::from(i)))
            .copied()
            .unwrap_or(0)
    }
}

/// Folds headings into a two-level outline.
///
/// Headings at `top_level` or shallower open a root entry. Deeper headings
/// join the children of the latest root entry, however deep they are; before
/// any root entry exists they are promoted to one.
pub fn build(headings: &[Heading], top_level: u8) -> Vec<OutlineNode> {
    let mut outline: Vec<OutlineNode> = Vec::new();

    for heading in headings {
        let node = OutlineNode::from(heading);
        if heading.level > top_level
            && let Some(parent) = outline.last_mut()
        {
            parent.children.push(node);
        } else {
            outline.push(node);
        }
    }

    outline
}

/// Renders the outline as a nested Markdown link list.
pub fn render_markdown(outline: &[OutlineNode]) -> String {
    let mut lines = Vec::new();
    for node in outline {
        lines.push(format!("- [{}]({})", escape_label(&node.title), node.anchor));
        for child in &node.children {
            lines.push(format!("  - [{}]({})", escape_label(&child.title), child.anchor));
        }
    }
    lines.join("\n")
}

fn escape_label(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if matches!(c, '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Anchors in preorder, the order a reader meets them in the outline.
pub fn anchors(outline: &[OutlineNode]) -> Vec<&str> {
    let mut out = Vec::new();
    for node in outline {
        out.push(node.anchor.as_str());
        out.extend(anchors(&node.children));
    }
    out
}
