//! SEO completeness score for a page's `seoData`

use pagecraft_model::MetadataMap;
use serde::Serialize;
use serde_json::Value;

const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoGrade {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoReport {
    pub score: u32,
    pub grade: SeoGrade,
    /// Fields that earned nothing
    pub missing: Vec<&'static str>,
}

fn text<'a>(seo: &'a MetadataMap, key: &str) -> &'a str {
    seo.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}

/// Keywords may be stored as an array or a comma-separated string
fn keyword_count(seo: &MetadataMap) -> usize {
    match seo.get("keywords") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|k| !k.trim().is_empty())
            .count(),
        Some(Value::String(s)) => s.split(',').filter(|k| !k.trim().is_empty()).count(),
        _ => 0,
    }
}

/// Points for a field whose length falls in `ideal`, with partial credit otherwise
fn ranged(len: usize, ideal: std::ops::RangeInclusive<usize>, full: u32, partial: u32) -> u32 {
    if ideal.contains(&len) {
        full
    } else if len > 0 {
        partial
    } else {
        0
    }
}

pub fn score(seo: &MetadataMap) -> SeoReport {
    let mut missing = Vec::new();
    let mut total = 0;

    let mut award = |name: &'static str, points: u32| {
        if points == 0 {
            missing.push(name);
        }
        total += points;
    };

    award("title", ranged(text(seo, "title").chars().count(), 30..=60, 20, 10));
    award(
        "description",
        ranged(text(seo, "description").chars().count(), 120..=160, 20, 10),
    );
    award("keywords", ranged(keyword_count(seo), 3..=5, 15, 8));

    let open_graph = !text(seo, "ogTitle").is_empty() && !text(seo, "ogDescription").is_empty();
    award("ogTitle", if open_graph { 15 } else { 0 });
    award("ogImage", if text(seo, "ogImage").is_empty() { 0 } else { 10 });
    award("canonicalUrl", if text(seo, "canonicalUrl").is_empty() { 0 } else { 10 });
    award("robots", if text(seo, "robots").is_empty() { 0 } else { 10 });

    let score = total.min(MAX_SCORE);
    let grade = if score >= 80 {
        SeoGrade::Good
    } else if score >= 60 {
        SeoGrade::Fair
    } else {
        SeoGrade::Poor
    };

    SeoReport {
        score,
        grade,
        missing,
    }
}
