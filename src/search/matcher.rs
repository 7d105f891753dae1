use super::normalizer::{compact, normalize};
use super::tokenizer::tokenize;
use crate::directory::types::{Record, QueryState};

/// True when the record passes both the category gate and the text gate.
pub fn matches(record: &Record, query: &QueryState) -> bool {
    query.active_category.admits(&record.category) && matches_text(record, &query.free_text)
}

/// AND search over `name + " " + message`.
///
/// Each token must be found either in the normalized source or, with all
/// whitespace removed on both sides, in its compact form. The second check
/// lets `"食 育"` match `"食育"` and vice versa.
pub fn matches_text(record: &Record, free_text: &str) -> bool {
    let tokens = tokenize(free_text);
    if tokens.is_empty() {
        return true;
    }

    let source = normalize(&format!("{} {}", record.name, record.message));
    let source_compact = compact(&source);

    tokens.iter().all(|token| {
        let token = normalize(token);
        let token_compact = compact(&token);
        source.contains(&token) || source_compact.contains(&token_compact)
    })
}
