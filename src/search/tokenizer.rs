/// Splits a free-text query into whitespace-delimited tokens.
///
/// Unlike a document tokenizer nothing is filtered out: a single-character
/// token is a perfectly good query in Japanese text.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}
