use std::borrow::Cow;

use ratatui::{
    style::{Modifier, Style},
    text::Span,
};
use unicode_segmentation::UnicodeSegmentation;

use super::super::input::InputLine;

pub(super) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = UnicodeSegmentation::graphemes(input, true).count();
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        let truncated: String = UnicodeSegmentation::graphemes(input, true)
            .take(max_graphemes)
            .collect();
        return Cow::Owned(truncated);
    }

    let keep = max_graphemes - ELLIPSIS_GRAPHEMES;
    let mut truncated: String = UnicodeSegmentation::graphemes(input, true).take(keep).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

/// Spans for a text field, with the cursor drawn as a reversed cell when focused.
pub(super) fn input_spans(line: &InputLine, focused: bool, style: Style) -> Vec<Span<'_>> {
    if !focused {
        return vec![Span::styled(line.text(), style)];
    }
    let (before, current, after) = line.split_at_cursor();
    let cursor_style = style.add_modifier(Modifier::REVERSED);
    vec![
        Span::styled(before, style),
        Span::styled(current.unwrap_or(" "), cursor_style),
        Span::styled(after, style),
    ]
}
