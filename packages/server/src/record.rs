//! Wire types for `/api/pages`

use chrono::{DateTime, Utc};
use pagecraft_model::{MetadataMap, PageData, PageElement};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PAGE_TYPE: &str = "page";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid status '{0}' (expected draft, published or archived)")]
pub struct InvalidStatus(pub String);

impl FromStr for PageStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PageStatus::Draft),
            "published" => Ok(PageStatus::Published),
            "archived" => Ok(PageStatus::Archived),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

/// A stored page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub status: PageStatus,
    /// Incremented on every write
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// `elements`, `seoData` and `schemaData`
    #[serde(flatten)]
    pub page: PageData,
}

/// Body of `POST /api/pages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PageStatus>,
    #[serde(flatten)]
    pub page: PageData,
}

impl NewPage {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            page_type: None,
            status: None,
            page: PageData::default(),
        }
    }

    pub fn with_page(mut self, page: PageData) -> Self {
        self.page = page;
        self
    }
}

/// Body of `PUT /api/pages/:id`; absent fields are left unchanged.
///
/// When `version` is present the update only applies if it matches the
/// stored version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PageStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<PageElement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_data: Option<MetadataMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_data: Option<MetadataMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl PageUpdate {
    /// Replace the page content, conditional on `version` when given
    pub fn content(page: PageData, version: Option<u64>) -> Self {
        Self {
            elements: Some(page.elements),
            seo_data: Some(page.seo_data),
            schema_data: Some(page.schema_data),
            version,
            ..Default::default()
        }
    }
}

/// A previous state of a page, kept in its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRevision {
    pub page_id: String,
    pub version: u64,
    pub title: String,
    pub slug: String,
    pub status: PageStatus,
    /// When this state was replaced
    pub replaced_at: DateTime<Utc>,
    #[serde(flatten)]
    pub page: PageData,
}

impl PageRevision {
    pub fn of(record: &PageRecord, replaced_at: DateTime<Utc>) -> Self {
        Self {
            page_id: record.id.clone(),
            version: record.version,
            title: record.title.clone(),
            slug: record.slug.clone(),
            status: record.status,
            replaced_at,
            page: record.page.clone(),
        }
    }
}

/// Body of `PATCH /api/pages/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: String,
}
