//! Directory Data Types
//!
//! Records as loaded from the endpoint, their on-screen views, and the query
//! state that drives filtering.

use crate::search::tokenizer::tokenize;
use serde::{Deserialize, Serialize};

/// Tab value that disables the category gate.
pub const ALL_CATEGORIES: &str = "all";

/// One directory entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub message: String,
    /// Canonical category, after the legacy mapping has been applied.
    pub category: String,
    pub url: String,
    pub style_class: String,
}

/// A record plus its presentation state.
///
/// `displayed_name` and `displayed_message` are HTML fragments that may carry
/// `<mark>` wrappers. They are always rebuilt from `record`, never the other
/// way round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub record: Record,
    pub displayed_name: String,
    pub displayed_message: String,
    pub is_visible: bool,
}

impl View {
    pub fn new(record: Record) -> Self {
        let mut view = Self {
            record,
            displayed_name: String::new(),
            displayed_message: String::new(),
            is_visible: true,
        };
        crate::search::highlighter::reset(&mut view);
        view
    }
}

/// The active category tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` maps to [`CategoryFilter::All`]; anything else is taken verbatim.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    /// Exact, codepoint-for-codepoint comparison. No normalization.
    pub fn admits(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(active) => active == category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(active) => active,
        }
    }
}

/// What the visitor asked for. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub free_text: String,
    pub active_category: CategoryFilter,
}

impl QueryState {
    pub fn new(free_text: &str, category: &str) -> Self {
        Self {
            free_text: free_text.to_string(),
            active_category: CategoryFilter::parse(category),
        }
    }

    pub fn with_free_text(&self, free_text: &str) -> Self {
        Self {
            free_text: free_text.to_string(),
            active_category: self.active_category.clone(),
        }
    }

    pub fn with_category(&self, category: &str) -> Self {
        Self {
            free_text: self.free_text.clone(),
            active_category: CategoryFilter::parse(category),
        }
    }

    /// Empty search text, same category.
    pub fn cleared(&self) -> Self {
        self.with_free_text("")
    }

    pub fn tokens(&self) -> Vec<String> {
        tokenize(&self.free_text)
    }
}
