/// JSON text helpers for the results pane

use serde_json::Value;
use std::borrow::Cow;

/// Appended to previews that were cut short
pub const CONTINUATION_MARKER: &str = "...";

/// Pretty-print with 2-space indentation
pub fn pretty(value: &Value) -> String {
    // Serializing a `Value` cannot fail: all map keys are strings
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Keep the first `max_chars` characters of `text`, marking the cut.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => Cow::Owned(format!("{}{}", &text[..byte_index], CONTINUATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}
