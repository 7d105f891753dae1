use super::types::{QueryState, Record, View};
use crate::error::DirectoryError;
use crate::search::highlighter::{apply_highlight, reset};
use crate::search::matcher::matches;

/// Inline message shown instead of the cards when loading failed.
pub const LOAD_ERROR_MESSAGE: &str =
    "企業情報の読み込みに失敗しました。時間をおいてページを再読み込みしてください。";

/// Every loaded record's view plus the query currently applied to them.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    views: Vec<View>,
    query: QueryState,
    visible_count: Option<usize>,
    load_error: Option<String>,
}

impl Directory {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            views: records.into_iter().map(View::new).collect(),
            query: QueryState::default(),
            visible_count: None,
            load_error: None,
        }
    }

    /// A failed load yields an empty directory carrying the inline message;
    /// the result counter stays cleared.
    pub fn from_load(result: Result<Vec<Record>, DirectoryError>) -> Self {
        match result {
            Ok(records) => Self::new(records),
            Err(e) => {
                tracing::error!("Failed to load companies: {}", e);
                Self {
                    load_error: Some(LOAD_ERROR_MESSAGE.to_string()),
                    ..Self::default()
                }
            }
        }
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn visible_views(&self) -> impl Iterator<Item = &View> {
        self.views.iter().filter(|view| view.is_visible)
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn visible_count(&self) -> Option<usize> {
        self.visible_count
    }

    /// Result counter text, or `None` while it is cleared.
    pub fn result_label(&self) -> Option<String> {
        self.visible_count.map(|count| format!("該当 {} 件", count))
    }

    /// Replaces the query without running a filter pass.
    pub fn set_query(&mut self, query: QueryState) {
        self.query = query;
    }

    /// Stores new search text. The caller decides when to filter.
    pub fn set_free_text(&mut self, free_text: &str) {
        self.query = self.query.with_free_text(free_text);
    }

    pub fn set_active_category(&mut self, category: &str) -> usize {
        self.query = self.query.with_category(category);
        self.apply_filters()
    }

    pub fn clear_search(&mut self) -> usize {
        self.query = self.query.cleared();
        self.apply_filters()
    }

    /// Recomputes visibility and highlighting for every view.
    pub fn apply_filters(&mut self) -> usize {
        if self.load_error.is_some() {
            return 0;
        }

        let tokens = self.query.tokens();
        let mut visible = 0;

        for view in self.views.iter_mut() {
            let show = matches(&view.record, &self.query);
            view.is_visible = show;
            if show {
                visible += 1;
                apply_highlight(view, &tokens);
            } else {
                reset(view);
            }
        }

        tracing::debug!(
            "Filter pass: query={:?} category={} visible={}/{}",
            self.query.free_text,
            self.query.active_category.as_str(),
            visible,
            self.views.len()
        );

        self.visible_count = Some(visible);
        visible
    }
}
