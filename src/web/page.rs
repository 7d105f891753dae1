//! Page Rendering
//!
//! Server-side rendition of the directory page: category tabs, the search
//! box, the result counter, one card per record and the contact form.
//! Card text comes from the views and is already escaped.

use crate::contact::types::FormState;
use crate::directory::category::CATEGORIES;
use crate::directory::listing::Directory;
use crate::directory::types::{ALL_CATEGORIES, View};
use crate::search::highlighter::escape_html;

pub fn render_page(directory: &Directory, form: &FormState) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>企業ディレクトリ</title>\n</head>\n<body>\n");

    render_tabs(&mut html, directory);
    render_search(&mut html, directory);

    html.push_str("<p id=\"resultCount\">");
    if let Some(label) = directory.result_label() {
        html.push_str(&escape_html(&label));
    }
    html.push_str("</p>\n");

    html.push_str("<div class=\"company-list\">\n");
    if let Some(message) = directory.load_error() {
        html.push_str(&format!("<p class=\"load-error\">{}</p>\n", escape_html(message)));
    }
    for view in directory.views() {
        render_card(&mut html, view);
    }
    html.push_str("</div>\n");

    render_contact_form(&mut html, form);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_tabs(html: &mut String, directory: &Directory) {
    let active = directory.query().active_category.as_str();
    let query = urlencoding::encode(&directory.query().free_text).into_owned();

    html.push_str("<nav class=\"tabs\">\n");
    let tabs = std::iter::once((ALL_CATEGORIES, "すべて"))
        .chain(CATEGORIES.iter().map(|(name, _)| (*name, *name)));
    for (value, label) in tabs {
        let class = if value == active {
            "tab-button active"
        } else {
            "tab-button"
        };
        html.push_str(&format!(
            "<a class=\"{}\" data-category=\"{}\" href=\"/?q={}&amp;category={}\">{}</a>\n",
            class,
            escape_html(value),
            query,
            urlencoding::encode(value),
            escape_html(label)
        ));
    }
    html.push_str("</nav>\n");
}

fn render_search(html: &mut String, directory: &Directory) {
    let query = directory.query();
    let category = query.active_category.as_str();
    html.push_str(&format!(
        "<form class=\"search\" method=\"get\" action=\"/\">\n\
         <input type=\"search\" id=\"freeword\" name=\"q\" value=\"{}\">\n\
         <input type=\"hidden\" name=\"category\" value=\"{}\">\n\
         <button type=\"submit\">検索</button>\n\
         <a id=\"clearSearch\" href=\"/?category={}\">クリア</a>\n\
         </form>\n",
        escape_html(&query.free_text),
        escape_html(category),
        urlencoding::encode(category)
    ));
}

fn render_card(html: &mut String, view: &View) {
    let style = if view.is_visible {
        ""
    } else {
        " style=\"display:none\""
    };
    html.push_str(&format!(
        "<article class=\"company-card {}\" data-category=\"{}\"{}>\n\
         <h3 class=\"company-name\">{}</h3>\n\
         <p class=\"company-message\">{}</p>\n\
         <a class=\"company-link\" href=\"{}\">詳しく見る</a>\n\
         </article>\n",
        escape_html(&view.record.style_class),
        escape_html(&view.record.category),
        style,
        view.displayed_name,
        view.displayed_message,
        escape_html(&view.record.url)
    ));
}

fn render_contact_form(html: &mut String, form: &FormState) {
    let values = &form.values;
    html.push_str("<form id=\"contactForm\" method=\"post\" action=\"/contact\">\n");

    let fields = [
        ("companyName", "会社名", &values.company_name),
        ("category", "カテゴリ", &values.category),
        ("lpUrl", "LP URL", &values.lp_url),
        ("contactName", "担当者名", &values.contact_name),
        ("email", "メールアドレス", &values.email),
        ("phone", "電話番号", &values.phone),
    ];
    for (name, label, value) in fields {
        html.push_str(&format!(
            "<label>{}<input name=\"{}\" value=\"{}\"></label>\n",
            label,
            name,
            escape_html(value)
        ));
    }
    html.push_str(&format!(
        "<label>メッセージ<textarea name=\"message\">{}</textarea></label>\n\
         <label>その他<textarea name=\"additionalInfo\">{}</textarea></label>\n\
         <input type=\"text\" name=\"website\" value=\"\" tabindex=\"-1\" autocomplete=\"off\" style=\"display:none\">\n",
        escape_html(&values.message),
        escape_html(&values.additional_info)
    ));

    html.push_str(&format!(
        "<button type=\"submit\" class=\"submit-btn\">送信する</button>\n\
         <p id=\"formStatus\">{}</p>\n</form>\n",
        form.status.as_deref().map(escape_html).unwrap_or_default()
    ));
}
