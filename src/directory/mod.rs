//! Directory Module
//!
//! Holds the loaded records and decides, for the current query, which cards
//! are visible and how their text is highlighted.
//!
//! ## Submodules
//! - **`types`**: `Record`, `View`, `QueryState` and the category filter.
//! - **`category`**: Static category tables (style classes, legacy names).
//! - **`listing`**: The `Directory` orchestrator and its filter pass.
//! - **`session`**: Event loop with debounced search input.

pub mod category;
pub mod listing;
pub mod session;
pub mod types;
