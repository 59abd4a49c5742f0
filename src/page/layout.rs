//! Layout arithmetic for the page, kept free of imgui so it can be tested.

pub const TOP_MARGIN: f32 = 32.0;
pub const SECTION_GAP: f32 = 40.0;
pub const SECTION_PADDING_X: f32 = 24.0;
pub const TEXT_MAX_WIDTH: f32 = 672.0;
pub const GRID_MAX_WIDTH: f32 = 1152.0;
pub const GRID_GAP: f32 = 32.0;
pub const CARD_PADDING: f32 = 24.0;
pub const CARD_ROUNDING: f32 = 12.0;
pub const TWO_COLUMN_MIN_WIDTH: f32 = 768.0;
pub const BOUNCE_HEIGHT: f32 = 6.0;

/// Number of project grid columns at the given viewport width.
pub fn grid_columns(viewport_width: f32) -> usize {
    if viewport_width >= TWO_COLUMN_MIN_WIDTH {
        2
    } else {
        1
    }
}

/// Width available to a block capped at `max_width` inside the padded section.
pub fn block_width(viewport_width: f32, max_width: f32) -> f32 {
    (viewport_width - 2.0 * SECTION_PADDING_X).clamp(0.0, max_width)
}

pub fn centered_x(container_width: f32, content_width: f32) -> f32 {
    ((container_width - content_width) * 0.5).max(0.0)
}

/// Top padding that vertically centres content inside a section of
/// `min_height`. Content taller than the section is not shifted.
pub fn centered_padding(min_height: f32, content_height: f32) -> f32 {
    ((min_height - content_height) * 0.5).max(0.0)
}

pub fn card_width(grid_width: f32, columns: usize) -> f32 {
    let columns = columns.max(1) as f32;
    ((grid_width - GRID_GAP * (columns - 1.0)) / columns).max(0.0)
}

/// Upward offset of the bouncing scroll hint, one bounce per second.
pub fn bounce_offset(time: f32) -> f32 {
    let phase = time.rem_euclid(1.0) * 2.0 - 1.0;
    -BOUNCE_HEIGHT * phase * phase
}

/// Greedy word wrap. `measure` returns the rendered width of a string.
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", line, word);
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monospace(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn projects_use_two_columns_on_wide_viewports() {
        assert_eq!(grid_columns(767.0), 1);
        assert_eq!(grid_columns(768.0), 2);
        assert_eq!(grid_columns(1920.0), 2);
    }

    #[test]
    fn blocks_are_capped_and_padded() {
        assert_eq!(block_width(1920.0, TEXT_MAX_WIDTH), TEXT_MAX_WIDTH);
        assert_eq!(block_width(400.0, TEXT_MAX_WIDTH), 352.0);
        assert_eq!(block_width(10.0, TEXT_MAX_WIDTH), 0.0);
    }

    #[test]
    fn cards_share_the_grid_width() {
        assert_eq!(card_width(1152.0, 2), 560.0);
        assert_eq!(card_width(500.0, 1), 500.0);
        assert_eq!(card_width(500.0, 0), 500.0);
    }

    #[test]
    fn centering_never_goes_negative() {
        assert_eq!(centered_padding(800.0, 400.0), 200.0);
        assert_eq!(centered_padding(800.0, 1200.0), 0.0);
        assert_eq!(centered_x(100.0, 40.0), 30.0);
        assert_eq!(centered_x(100.0, 140.0), 0.0);
    }

    #[test]
    fn bounce_peaks_on_the_second() {
        assert_eq!(bounce_offset(0.0), -BOUNCE_HEIGHT);
        assert_eq!(bounce_offset(0.5), 0.0);
        assert!(bounce_offset(0.75) < 0.0 && bounce_offset(0.75) > -BOUNCE_HEIGHT);
    }

    #[test]
    fn words_wrap_at_width() {
        let lines = wrap_words("one two three four", 90.0, monospace);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap_words("a extraordinarily b", 50.0, monospace);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_words("   ", 100.0, monospace).is_empty());
    }
}
