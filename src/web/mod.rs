//! Web Module
//!
//! A local HTTP surface over the library: the rendered directory page, a
//! JSON view of the same listing, and the contact form endpoint.

pub mod handlers;
pub mod page;
pub mod types;


use axum::routing::{get, post};
use axum::Router;
use handlers::{AppState, handle_companies, handle_contact, handle_page};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_page))
        .route("/api/companies", get(handle_companies))
        .route("/contact", post(handle_contact))
        .with_state(state)
}
