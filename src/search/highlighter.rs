use crate::directory::types::View;
use regex::RegexBuilder;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Restores both displayed fields to the record's plain (escaped) text.
pub fn reset(view: &mut View) {
    view.displayed_name = escape_html(&view.record.name);
    view.displayed_message = escape_html(&view.record.message);
}

/// Wraps every case-insensitive occurrence of each token in `<mark>`.
///
/// Always starts from the reset state. Tokens are applied in order and each
/// one searches the output of the previous one, so overlapping tokens can
/// produce nested markers.
pub fn apply_highlight(view: &mut View, tokens: &[String]) {
    reset(view);

    for token in tokens.iter().filter(|token| !token.is_empty()) {
        let pattern = regex::escape(&escape_html(token));
        let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!("Skipping highlight for token {:?}: {}", token, e);
                continue;
            }
        };

        let replacement = format!("{}${{0}}{}", MARK_OPEN, MARK_CLOSE);
        view.displayed_name = re
            .replace_all(&view.displayed_name, replacement.as_str())
            .into_owned();
        view.displayed_message = re
            .replace_all(&view.displayed_message, replacement.as_str())
            .into_owned();
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
