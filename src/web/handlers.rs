use super::page::render_page;
use super::types::{CompaniesResponse, DirectoryParams};
use crate::contact::handlers::Submitter;
use crate::contact::types::{ContactForm, FormState};
use crate::directory::listing::Directory;
use crate::directory::types::{ALL_CATEGORIES, QueryState};
use crate::loader::service::Loader;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::{Form, Json};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<Loader>,
    pub submitter: Submitter,
}

impl AppState {
    /// Loads the listing and applies the requested query, the same way a page
    /// load does: every request fetches afresh.
    pub async fn load_directory(&self, params: &DirectoryParams) -> Directory {
        let mut directory = Directory::from_load(self.loader.load_companies().await);
        let category = params.category.as_deref().unwrap_or(ALL_CATEGORIES);
        directory.set_query(QueryState::new(&params.q, category));
        directory.apply_filters();
        directory
    }
}

pub async fn handle_page(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> Html<String> {
    let directory = state.load_directory(&params).await;
    Html(render_page(&directory, &FormState::default()))
}

pub async fn handle_companies(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> Json<CompaniesResponse> {
    let directory = state.load_directory(&params).await;
    Json(CompaniesResponse::from_directory(&directory))
}

pub async fn handle_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Html<String> {
    let form_state = state.submitter.handle(form, None).await;
    let directory = state.load_directory(&DirectoryParams::default()).await;
    Html(render_page(&directory, &form_state))
}
