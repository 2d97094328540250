//! Reduces a raw heading line to its reading text.
//!
//! Passes run in a fixed order: link and image syntax is collapsed before
//! emphasis markers are dropped, so markers inside link text are removed too.

pub fn sanitize(raw: &str) -> String {
    let text = strip_code_ticks(raw);
    let text = collapse_links(&text);
    let text = strip_asterisks(&text);
    let text = strip_underscore_emphasis(&text);
    let text = strip_strikethrough(&text);
    let text = strip_tags(&text);
    text.trim().to_string()
}

/// Removes backtick runs of any length, keeping the enclosed text.
fn strip_code_ticks(text: &str) -> String {
    text.chars().filter(|&c| c != '`').collect()
}

/// `[text](url)` becomes `text`, `![alt](url)` becomes `alt`.
///
/// The label must be non-empty and runs to the first `]`; the destination
/// runs to the first `)`. Anything else is left as written.
fn collapse_links(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let is_image = chars[i] == '!' && chars.get(i + 1) == Some(&'[');
        let open = if is_image { i + 1 } else { i };

        if chars[open] == '['
            && let Some((label_end, link_end)) = match_link(&chars, open)
        {
            out.extend(&chars[open + 1..label_end]);
            i = link_end + 1;
            continue;
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Returns the index of the closing `]` and of the closing `)`.
fn match_link(chars: &[char], open: usize) -> Option<(usize, usize)> {
    let label_end = open + 1 + chars[open + 1..].iter().position(|&c| c == ']')?;
    if label_end == open + 1 || chars.get(label_end + 1) != Some(&'(') {
        return None;
    }
    let dest_start = label_end + 2;
    let link_end = dest_start + chars[dest_start..].iter().position(|&c| c == ')')?;
    Some((label_end, link_end))
}

fn strip_asterisks(text: &str) -> String {
    text.chars().filter(|&c| c != '*').collect()
}

/// Drops `_` runs used as emphasis delimiters. A run with an alphanumeric
/// character on both sides is intraword (`snake_case`) and stays.
fn strip_underscore_emphasis(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '_' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i] == '_' {
            i += 1;
        }

        let before = start.checked_sub(1).map(|j| chars[j]);
        let after = chars.get(i).copied();
        let intraword = before.is_some_and(char::is_alphanumeric)
            && after.is_some_and(char::is_alphanumeric);
        if intraword {
            out.extend(&chars[start..i]);
        }
    }

    out
}

/// Removes `~~` markers; a lone `~` is ordinary text.
fn strip_strikethrough(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '~' {
            let start = i;
            while i < chars.len() && chars[i] == '~' {
                i += 1;
            }
            if i - start == 1 {
                out.push('~');
            }
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Removes `<...>` spans with at least one character between the brackets.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => rest = &after[close + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
