//! Search Module
//!
//! The in-memory filter behind the directory's search box.
//!
//! ## Overview
//! Queries are split into tokens and every token must match (AND semantics).
//! Matching runs on normalized text, so case and full-width/half-width
//! differences are ignored, and it tolerates spacing differences between
//! the query and the source. Highlighting runs on the displayed text only and
//! never touches the underlying record.
//!
//! ## Submodules
//! - **`normalizer`**: Case/width folding and whitespace compaction.
//! - **`tokenizer`**: Splits a query into whitespace-delimited tokens.
//! - **`matcher`**: Category gate plus token-AND text gate.
//! - **`highlighter`**: Wraps matched spans in `<mark>` and resets them.

pub mod highlighter;
pub mod matcher;
pub mod normalizer;
pub mod tokenizer;
