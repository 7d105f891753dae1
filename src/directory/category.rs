//! Category Tables
//!
//! Both tables are fixed at compile time. The legacy table is applied once,
//! at load time, so the matcher and the tabs only ever see canonical names.

/// Style class for categories the table doesn't know.
pub const FALLBACK_STYLE_CLASS: &str = "others";

/// Canonical categories in tab order, with their card style class.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("健康", "health"),
    ("美容", "beauty"),
    ("食品", "food"),
    ("教育", "education"),
    ("IT", "tech"),
    ("その他", "others"),
];

pub fn style_class_for(category: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, class)| *class)
        .unwrap_or(FALLBACK_STYLE_CLASS)
}

/// Maps names used by older spreadsheet revisions onto the current ones.
/// Unknown values pass through unchanged.
pub fn canonical_category(raw: &str) -> String {
    let trimmed = raw.trim();
    let canonical = match trimmed {
        "健康・医療" | "ヘルスケア" | "健康食品" => "健康",
        "美容・コスメ" | "コスメ" | "ビューティー" => "美容",
        "食品・飲料" | "グルメ" | "飲食" => "食品",
        "教育・学習" | "スクール" => "教育",
        "IT・テクノロジー" | "テクノロジー" | "IT・Web" => "IT",
        "その他・未分類" | "未分類" => "その他",
        other => other,
    };
    canonical.to_string()
}
