//! Reply shaping utilities.
//!
//! Everything here is pure string work: length-capping model output,
//! splitting over-long replies, and rendering recommendation lists for the
//! transport layer to send verbatim.

use crate::prompts;
use crate::types::{Category, ListItem};

/// Ellipsis appended to truncated replies.
const ELLIPSIS: &str = "...";

/// Cap a reply at `limit` bytes, preferring a sentence boundary.
///
/// Text within the limit passes through untouched. Otherwise the text is
/// cut to `limit - 3` bytes; if a sentence terminator (`.`, `!`, `?`)
/// falls within the trailing 20% of the limit window, the cut lands just
/// after it. Either way an ellipsis is appended and the result is at most
/// `limit` bytes, always on a char boundary.
pub fn truncate_reply(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    if limit <= ELLIPSIS.len() {
        return text[..floor_char_boundary(text, limit)].to_string();
    }

    let cut = floor_char_boundary(text, limit - ELLIPSIS.len());
    let threshold = limit * 4 / 5;
    if let Some(idx) = text[..cut].rfind(['.', '!', '?'])
        && idx + 1 > threshold
    {
        return format!("{}{ELLIPSIS}", &text[..=idx]);
    }
    format!("{}{ELLIPSIS}", &text[..cut])
}

/// Split a reply into chunks of at most `limit` bytes, preserving lines
/// where possible. A single line longer than the limit is chunked at char
/// boundaries.
pub fn split_reply(text: &str, limit: usize) -> Vec<String> {
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if current.len() + line.len() + 1 > limit {
            if !current.is_empty() {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            if line.len() > limit {
                let mut rest = line;
                while rest.len() > limit {
                    let cut = floor_char_boundary(rest, limit);
                    parts.push(rest[..cut].to_string());
                    rest = &rest[cut..];
                }
                current = rest.to_string();
            } else {
                current = line.to_string();
            }
        } else if current.is_empty() {
            current = line.to_string();
        } else {
            current.push('\n');
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Render a recommendation list for one page.
pub fn format_items(items: &[ListItem], category: Category) -> String {
    if items.is_empty() {
        return prompts::EMPTY_LIST_REPLY.to_string();
    }

    let marker = match category {
        Category::Popular => "🔥",
        Category::New => "🆕",
        Category::Classic => "👑",
    };

    let mut out = format!("{marker} Recommendations:\n\n");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}", i + 1, item.title));
        if let Some(year) = item.year {
            out.push_str(&format!(" ({year})"));
        }
        out.push('\n');
        if let Some(rating) = item.rating {
            out.push_str(&format!("   ⭐ {rating}\n"));
        }
        if let Some(ref description) = item.description {
            out.push_str(&format!("   {description}\n"));
        }
        out.push('\n');
    }
    out
}

/// "Page X of Y" footer line. Empty when there is only one page.
pub fn page_footer(current_page: usize, total_pages: usize, total_items: usize) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    format!("\nPage {current_page} of {total_pages} ({total_items} titles)")
}

/// Largest byte index `<= idx` that lands on a char boundary.
fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_boundary_snaps_back_inside_multibyte() {
        let s = "héllo"; // 'é' occupies bytes 1..3
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 3), 3);
        assert_eq!(floor_char_boundary(s, 99), s.len());
    }

    #[test]
    fn short_text_untouched() {
        assert_eq!(truncate_reply("short", 100), "short");
    }

    #[test]
    fn page_footer_empty_for_single_page() {
        assert_eq!(page_footer(1, 1, 3), "");
        assert_eq!(page_footer(2, 3, 7), "\nPage 2 of 3 (7 titles)");
    }
}
