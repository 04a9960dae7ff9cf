use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Terminal cells needed to show `s`
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Fit `s` into `max_cells`, ending in `…` when something had to go.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if s.width() <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let mut used = 0;
    let mut out: String = s
        .graphemes(true)
        .take_while(|g| {
            used += g.width();
            used < max_cells
        })
        .collect();
    out.push(ELLIPSIS);
    out
}

/// Left-align `s` in a field `cells` wide
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let fill = cells.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

/// Byte offset of the grapheme boundary after `at`, if any
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let rest = s.get(at..).filter(|r| !r.is_empty())?;
    let step = rest.graphemes(true).next().map_or(rest.len(), str::len);
    Some(at + step)
}

/// Byte offset of the grapheme boundary before `at`, if any
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let head = s.get(..at).filter(|h| !h.is_empty())?;
    head.grapheme_indices(true).next_back().map(|(i, _)| i)
}

/// Where Ctrl-W deletes back to: skip spaces left of `at`, then the word before them
pub fn word_boundary_left(s: &str, at: usize) -> usize {
    let Some(head) = s.get(..at) else {
        return 0;
    };
    let is_space = |g: &str| g.chars().all(char::is_whitespace);

    let mut boundary = 0;
    let mut seen_word = false;
    for (i, g) in head.grapheme_indices(true).rev() {
        if is_space(g) {
            if seen_word {
                break;
            }
        } else {
            seen_word = true;
        }
        boundary = i;
    }
    boundary
}
