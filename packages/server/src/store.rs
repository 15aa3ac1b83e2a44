use crate::config::ServerConfig;
use crate::record::{NewPage, PageRecord, PageRevision, PageStatus, PageUpdate, DEFAULT_PAGE_TYPE};
use chrono::Utc;
use pagecraft_model::TreeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Page with slug '{0}' already exists")]
    SlugTaken(String),

    #[error("Invalid page tree: {0}")]
    InvalidTree(#[from] TreeError),

    #[error("Version conflict: expected {expected}, stored version is {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt page file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize page: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// On-disk layout of one page file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPage {
    record: PageRecord,
    /// Oldest first
    #[serde(default)]
    history: Vec<PageRevision>,
}

/// Page records shared by all request handlers.
///
/// Every write validates, persists (when a data directory is configured) and
/// only then replaces the in-memory record, so a failed write leaves the
/// stored page unchanged.
#[derive(Debug)]
pub struct PageStore {
    pages: RwLock<BTreeMap<String, StoredPage>>,
    data_dir: Option<PathBuf>,
    history_limit: usize,
}

impl PageStore {
    pub fn in_memory(history_limit: usize) -> Self {
        Self {
            pages: RwLock::new(BTreeMap::new()),
            data_dir: None,
            history_limit,
        }
    }

    /// Open a data directory, loading every `*.json` page file in it
    pub async fn open(dir: impl Into<PathBuf>, history_limit: usize) -> StoreResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let mut pages = BTreeMap::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path).await?;
            let stored: StoredPage = serde_json::from_str(&content)
                .map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?;
            stored.record.page.validate()?;
            pages.insert(stored.record.id.clone(), stored);
        }

        info!(dir = %dir.display(), pages = pages.len(), "Loaded page store");
        Ok(Self {
            pages: RwLock::new(pages),
            data_dir: Some(dir),
            history_limit,
        })
    }

    pub async fn from_config(config: &ServerConfig) -> StoreResult<Self> {
        match &config.data_dir {
            Some(dir) => Self::open(dir, config.history_limit).await,
            None => Ok(Self::in_memory(config.history_limit)),
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// All pages, oldest first
    pub async fn list(&self) -> Vec<PageRecord> {
        let pages = self.pages.read().await;
        let mut records: Vec<PageRecord> = pages.values().map(|p| p.record.clone()).collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        records
    }

    pub async fn get(&self, id: &str) -> StoreResult<PageRecord> {
        let pages = self.pages.read().await;
        pages
            .get(id)
            .map(|p| p.record.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> StoreResult<PageRecord> {
        let pages = self.pages.read().await;
        pages
            .values()
            .find(|p| p.record.slug == slug)
            .map(|p| p.record.clone())
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    #[instrument(skip(self, new_page), fields(slug = %new_page.slug))]
    pub async fn create(&self, new_page: NewPage) -> StoreResult<PageRecord> {
        validate_title(&new_page.title)?;
        validate_slug(&new_page.slug)?;
        new_page.page.validate()?;

        let mut pages = self.pages.write().await;
        ensure_slug_free(&pages, &new_page.slug, None)?;

        let now = Utc::now();
        let status = new_page.status.unwrap_or_default();
        let record = PageRecord {
            id: Uuid::new_v4().to_string(),
            title: new_page.title.trim().to_string(),
            slug: new_page.slug,
            page_type: new_page
                .page_type
                .unwrap_or_else(|| DEFAULT_PAGE_TYPE.to_string()),
            status,
            version: 1,
            created_at: now,
            last_modified: now,
            published_at: (status == PageStatus::Published).then_some(now),
            page: new_page.page,
        };

        let stored = StoredPage {
            record: record.clone(),
            history: Vec::new(),
        };
        self.persist(&stored).await?;
        pages.insert(record.id.clone(), stored);

        info!(page_id = %record.id, "Created page");
        Ok(record)
    }

    /// Apply a sparse update as one write
    #[instrument(skip(self, update), fields(expected_version = ?update.version))]
    pub async fn update(&self, id: &str, update: PageUpdate) -> StoreResult<PageRecord> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(slug) = &update.slug {
            validate_slug(slug)?;
        }
        if let Some(elements) = &update.elements {
            pagecraft_model::tree::validate(elements)?;
        }

        let mut pages = self.pages.write().await;
        let current = pages
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(expected) = update.version {
            if expected != current.record.version {
                warn!(
                    page_id = %id,
                    expected,
                    actual = current.record.version,
                    "Rejected stale update"
                );
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: current.record.version,
                });
            }
        }
        if let Some(slug) = &update.slug {
            ensure_slug_free(&pages, slug, Some(id))?;
        }

        let next = self.next_revision(current, |record| {
            if let Some(title) = update.title {
                record.title = title.trim().to_string();
            }
            if let Some(slug) = update.slug {
                record.slug = slug;
            }
            if let Some(page_type) = update.page_type {
                record.page_type = page_type;
            }
            if let Some(status) = update.status {
                set_status(record, status);
            }
            if let Some(elements) = update.elements {
                record.page.elements = elements;
            }
            if let Some(seo_data) = update.seo_data {
                record.page.seo_data = seo_data;
            }
            if let Some(schema_data) = update.schema_data {
                record.page.schema_data = schema_data;
            }
        });

        self.persist(&next).await?;
        let record = next.record.clone();
        pages.insert(id.to_string(), next);

        info!(page_id = %id, version = record.version, "Updated page");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &str, status: PageStatus) -> StoreResult<PageRecord> {
        let mut pages = self.pages.write().await;
        let current = pages
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let next = self.next_revision(current, |record| set_status(record, status));
        self.persist(&next).await?;
        let record = next.record.clone();
        pages.insert(id.to_string(), next);

        info!(page_id = %id, status = %status, "Changed page status");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut pages = self.pages.write().await;
        if !pages.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        if let Some(path) = self.page_path(id) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        pages.remove(id);

        info!(page_id = %id, "Deleted page");
        Ok(())
    }

    /// Previous revisions, newest first
    pub async fn versions(&self, id: &str) -> StoreResult<Vec<PageRevision>> {
        let pages = self.pages.read().await;
        let stored = pages
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(stored.history.iter().rev().cloned().collect())
    }

    /// Copy of `current` with one more history entry and the edit applied
    fn next_revision(&self, current: &StoredPage, edit: impl FnOnce(&mut PageRecord)) -> StoredPage {
        let now = Utc::now();
        let mut history = current.history.clone();
        history.push(PageRevision::of(&current.record, now));
        if history.len() > self.history_limit {
            let excess = history.len() - self.history_limit;
            history.drain(..excess);
        }

        let mut record = current.record.clone();
        edit(&mut record);
        record.version += 1;
        record.last_modified = now;

        StoredPage { record, history }
    }

    fn page_path(&self, id: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", id)))
    }

    /// Write via a temp file and rename so readers never see a partial page
    async fn persist(&self, stored: &StoredPage) -> StoreResult<()> {
        let Some(path) = self.page_path(&stored.record.id) else {
            return Ok(());
        };

        let content = serde_json::to_vec_pretty(stored)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), bytes = content.len(), "Persisted page");
        Ok(())
    }
}

fn set_status(record: &mut PageRecord, status: PageStatus) {
    if status == PageStatus::Published {
        record.published_at = Some(Utc::now());
    }
    record.status = status;
}

fn validate_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> StoreResult<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(StoreError::Validation(format!(
            "slug '{}' may only contain lowercase letters, digits and dashes",
            slug
        )));
    }
    Ok(())
}

fn ensure_slug_free(
    pages: &BTreeMap<String, StoredPage>,
    slug: &str,
    except_id: Option<&str>,
) -> StoreResult<()> {
    let taken = pages
        .values()
        .any(|p| p.record.slug == slug && Some(p.record.id.as_str()) != except_id);
    if taken {
        return Err(StoreError::SlugTaken(slug.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{ElementKind, PageData, PageElement};

    fn home() -> NewPage {
        NewPage::new("Home", "home").with_page(PageData::new(vec![PageElement::new(
            "h-1",
            ElementKind::Text,
        )]))
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_version() {
        let store = PageStore::in_memory(20);
        let record = store.create(home()).await.unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.version, 1);
        assert_eq!(record.status, PageStatus::Draft);
        assert_eq!(record.page_type, "page");
        assert_eq!(store.get_by_slug("home").await.unwrap().id, record.id);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let store = PageStore::in_memory(20);

        let blank = store.create(NewPage::new("  ", "x")).await;
        assert!(matches!(blank, Err(StoreError::Validation(_))));

        let bad_slug = store.create(NewPage::new("About", "About Us")).await;
        assert!(matches!(bad_slug, Err(StoreError::Validation(_))));

        let dupes = PageData::new(vec![
            PageElement::new("a", ElementKind::Text),
            PageElement::new("a", ElementKind::Text),
        ]);
        let dup_ids = store.create(NewPage::new("Dupes", "dupes").with_page(dupes)).await;
        assert!(matches!(dup_ids, Err(StoreError::InvalidTree(TreeError::DuplicateId(_)))));

        store.create(home()).await.unwrap();
        assert!(matches!(store.create(home()).await, Err(StoreError::SlugTaken(_))));
    }

    #[tokio::test]
    async fn test_versioned_update() {
        let store = PageStore::in_memory(20);
        let record = store.create(home()).await.unwrap();

        let update = PageUpdate {
            title: Some("Welcome".into()),
            version: Some(1),
            ..Default::default()
        };
        let updated = store.update(&record.id, update.clone()).await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.title, "Welcome");

        // Same base version again is stale
        let err = store.update(&record.id, update).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { expected: 1, actual: 2 }));

        // No version: last write wins
        let blind = PageUpdate {
            title: Some("Blind".into()),
            ..Default::default()
        };
        assert_eq!(store.update(&record.id, blind).await.unwrap().version, 3);
    }

    #[tokio::test]
    async fn test_history_is_capped_and_newest_first() {
        let store = PageStore::in_memory(2);
        let record = store.create(home()).await.unwrap();

        for title in ["One", "Two", "Three"] {
            let update = PageUpdate {
                title: Some(title.into()),
                ..Default::default()
            };
            store.update(&record.id, update).await.unwrap();
        }

        let versions = store.versions(&record.id).await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].version, 3);
        assert_eq!(versions[0].title, "Two");
        assert_eq!(versions[1].version, 2);
    }

    #[tokio::test]
    async fn test_publish_sets_timestamp() {
        let store = PageStore::in_memory(20);
        let record = store.create(home()).await.unwrap();
        assert!(record.published_at.is_none());

        let published = store.set_status(&record.id, PageStatus::Published).await.unwrap();
        assert_eq!(published.status, PageStatus::Published);
        assert!(published.published_at.is_some());
        assert_eq!(published.version, 2);
    }

    #[tokio::test]
    async fn test_slug_change_conflicts() {
        let store = PageStore::in_memory(20);
        store.create(home()).await.unwrap();
        let about = store.create(NewPage::new("About", "about")).await.unwrap();

        let update = PageUpdate {
            slug: Some("home".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(&about.id, update).await,
            Err(StoreError::SlugTaken(_))
        ));

        // Keeping its own slug is fine
        let update = PageUpdate {
            slug: Some("about".into()),
            ..Default::default()
        };
        assert!(store.update(&about.id, update).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_pages() {
        let store = PageStore::in_memory(20);
        assert!(matches!(store.get("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.set_status("nope", PageStatus::Archived).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
