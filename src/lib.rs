//! Company Directory Library
//!
//! Loads a list of companies from a remote, spreadsheet-backed endpoint and
//! filters it by category and free-text search with highlighting. The binary
//! (`main.rs`) serves the result as a page.
//!
//! ## Modules
//! - **`search`**: Normalization, tokenization, token-AND matching and
//!   highlighting.
//! - **`directory`**: Records, views, query state, and the filter pass that
//!   ties them together (plus a debounced interactive session).
//! - **`loader`**: Fetches the listing with a direct request, falling back to
//!   a callback-style request.
//! - **`contact`**: Forwards the listing-request form to the endpoint.
//! - **`web`**: Axum routes for the page, the JSON listing and the form.
//! - **`config`** / **`error`**: Environment configuration and the error
//!   taxonomy shared by the above.

pub mod config;
pub mod contact;
pub mod directory;
pub mod error;
pub mod loader;
pub mod search;
pub mod web;
