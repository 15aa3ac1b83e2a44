//! Data directory persistence tests

use pagecraft_model::{ElementKind, PageData, PageElement};
use pagecraft_server::{NewPage, PageStatus, PageStore, PageUpdate, StoreError};

fn page_with_text(id: &str, text: &str) -> PageData {
    PageData::new(vec![PageElement::new(id, ElementKind::Text).with_content(text)])
}

#[tokio::test]
async fn test_pages_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let store = PageStore::open(dir.path(), 20).await.unwrap();
        let record = store
            .create(NewPage::new("Home", "home").with_page(page_with_text("t-1", "Hello")))
            .await
            .unwrap();
        store
            .update(
                &record.id,
                PageUpdate::content(page_with_text("t-1", "Hello again"), Some(1)),
            )
            .await
            .unwrap();
        record.id
    };

    let reopened = PageStore::open(dir.path(), 20).await.unwrap();
    let record = reopened.get(&id).await.unwrap();
    assert_eq!(record.version, 2);
    assert_eq!(
        record.page.find_by_id("t-1").unwrap().content_text(),
        Some("Hello again")
    );

    let versions = reopened.versions(&id).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(
        versions[0].page.find_by_id("t-1").unwrap().content_text(),
        Some("Hello")
    );
}

#[tokio::test]
async fn test_one_file_per_page_and_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path(), 20).await.unwrap();

    let home = store.create(NewPage::new("Home", "home")).await.unwrap();
    store.create(NewPage::new("About", "about")).await.unwrap();
    store.set_status(&home.id, PageStatus::Published).await.unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.ends_with(".json")));
    assert!(names.contains(&format!("{}.json", home.id)));
}

#[tokio::test]
async fn test_delete_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path(), 20).await.unwrap();
    let record = store.create(NewPage::new("Home", "home")).await.unwrap();

    store.delete(&record.id).await.unwrap();

    assert!(!dir.path().join(format!("{}.json", record.id)).exists());
    let reopened = PageStore::open(dir.path(), 20).await.unwrap();
    assert!(reopened.list().await.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let err = PageStore::open(dir.path(), 20).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[tokio::test]
async fn test_non_json_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.txt"), "notes").unwrap();

    let store = PageStore::open(dir.path(), 20).await.unwrap();
    assert!(store.list().await.is_empty());
    assert_eq!(store.data_dir(), Some(dir.path()));
}
