use crate::directory::listing::Directory;
use serde::{Deserialize, Serialize};

/// Query string shared by the page and the JSON listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompaniesResponse {
    pub ok: bool,
    pub query: String,
    pub category: String,
    /// `None` when the listing could not be loaded.
    pub count: Option<usize>,
    pub error: Option<String>,
    pub items: Vec<CompanyItem>,
}

/// A visible card. `name_html`/`message_html` carry the `<mark>` wrappers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyItem {
    pub name: String,
    pub message: String,
    pub name_html: String,
    pub message_html: String,
    pub category: String,
    pub url: String,
    pub style_class: String,
}

impl CompaniesResponse {
    pub fn from_directory(directory: &Directory) -> Self {
        let items = directory
            .visible_views()
            .map(|view| CompanyItem {
                name: view.record.name.clone(),
                message: view.record.message.clone(),
                name_html: view.displayed_name.clone(),
                message_html: view.displayed_message.clone(),
                category: view.record.category.clone(),
                url: view.record.url.clone(),
                style_class: view.record.style_class.clone(),
            })
            .collect();

        Self {
            ok: directory.load_error().is_none(),
            query: directory.query().free_text.clone(),
            category: directory.query().active_category.as_str().to_string(),
            count: directory.visible_count(),
            error: directory.load_error().map(str::to_string),
            items,
        }
    }
}
