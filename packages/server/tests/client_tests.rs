//! Client and save-flow tests against a live listener

use pagecraft_editor::{EditSession, EditorError, SaveOutcome, SaveStatus};
use pagecraft_library::ComponentLibrary;
use pagecraft_model::{PageData, SequentialIds};
use pagecraft_server::{
    app, save_session, ClientError, NewPage, PageDraft, PageStatus, PageStore, PageUpdate,
    PagesClient, ServerConfig,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

async fn spawn_server() -> PagesClient {
    let config = ServerConfig::default();
    let router = app(Arc::new(PageStore::in_memory(config.history_limit)), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    PagesClient::new(format!("http://{}", addr)).unwrap()
}

fn session() -> EditSession {
    EditSession::new("session-1", PageData::default()).with_id_source(SequentialIds::new("el"))
}

#[tokio::test]
async fn test_client_crud() {
    let client = spawn_server().await;

    let created = client.create(&NewPage::new("Home", "home")).await.unwrap();
    assert_eq!(client.get(&created.id).await.unwrap(), created);
    assert_eq!(client.get_by_slug("home").await.unwrap().id, created.id);
    assert_eq!(client.list().await.unwrap().len(), 1);

    let published = client
        .set_status(&created.id, PageStatus::Published)
        .await
        .unwrap();
    assert_eq!(published.version, 2);
    assert_eq!(client.versions(&created.id).await.unwrap().len(), 1);

    client.delete(&created.id).await.unwrap();
    assert!(matches!(
        client.get(&created.id).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_stale_update_is_a_conflict() {
    let client = spawn_server().await;
    let created = client.create(&NewPage::new("Home", "home")).await.unwrap();

    let update = PageUpdate::content(PageData::default(), Some(1));
    client.update(&created.id, &update).await.unwrap();

    let err = client.update(&created.id, &update).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));
}

#[tokio::test]
async fn test_save_session_creates_then_updates() {
    let client = spawn_server().await;
    let library = ComponentLibrary::standard();
    let draft = PageDraft::new("Landing", "landing");
    let cancel = CancellationToken::new();

    let mut session = session();
    session
        .insert_template(library.get("hero-banner").unwrap(), None, None)
        .unwrap();

    let outcome = save_session(&mut session, &client, &draft, &cancel)
        .await
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Saved);
    let revision = session.revision().unwrap().clone();
    assert_eq!(revision.version, 1);

    session
        .insert_template(library.get("button-primary").unwrap(), None, None)
        .unwrap();
    save_session(&mut session, &client, &draft, &cancel)
        .await
        .unwrap();

    let stored = client.get(&revision.page_id).await.unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.page, *session.page());
    assert_eq!(session.save_status(), SaveStatus::Saved);
}

#[tokio::test]
async fn test_concurrent_edit_surfaces_conflict() {
    let client = spawn_server().await;
    let draft = PageDraft::new("Landing", "landing");
    let cancel = CancellationToken::new();

    let mut session = session();
    save_session(&mut session, &client, &draft, &cancel)
        .await
        .unwrap();
    let page_id = session.revision().unwrap().page_id.clone();

    // Someone else saves first
    client
        .update(&page_id, &PageUpdate::content(PageData::default(), None))
        .await
        .unwrap();

    let err = save_session(&mut session, &client, &draft, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::Persistence(_)));
    assert!(err.is_user_facing());
    assert_eq!(session.save_status(), SaveStatus::Unsaved);
}

#[tokio::test]
async fn test_cancelled_save_is_discarded() {
    let client = spawn_server().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut session = session();
    let outcome = save_session(&mut session, &client, &PageDraft::new("Landing", "landing"), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Discarded);
    assert!(session.is_closed());
    assert!(session.revision().is_none());
    assert!(client.list().await.unwrap().is_empty());
}
