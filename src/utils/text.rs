use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Truncate text to a display width, ending with `...` when cut
///
/// # Examples
/// ```
/// use trioexplorer::utils::text::truncate_text;
/// assert_eq!(truncate_text("Hello World!", 8), "Hello...");
/// ```
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let ellipsis_width = ELLIPSIS.width();
    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// First `count` characters, without an ellipsis. Used to cut timestamps and
/// identifiers to a fixed column size.
pub fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Hello", 10), "Hello");
        assert_eq!(truncate_text("Hello World!", 8), "Hello...");
        assert_eq!(truncate_text("", 5), "");
        assert_eq!(truncate_text("abcdef", 2), "..");
    }

    #[test]
    fn test_truncate_text_wide_chars() {
        // Each CJK character is two columns wide
        let text = "患者の経過記録";
        let truncated = truncate_text(text, 9);
        assert_eq!(truncated, "患者の...");
        assert!(truncated.width() <= 9);
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("2025-03-14T09:26:53.589Z", 10), "2025-03-14");
        assert_eq!(take_chars("2025-03-14T09:26:53.589Z", 19), "2025-03-14T09:26:53");
        assert_eq!(take_chars("short", 12), "short");
    }
}
