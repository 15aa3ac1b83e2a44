//! HTTP client for `/api/pages` and the editor save flow built on it

use crate::record::{NewPage, PageRecord, PageRevision, PageStatus, PageUpdate, StatusChange};
use pagecraft_editor::{EditSession, EditorError, SaveOutcome, SavedRevision};
use pagecraft_model::PageData;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("page was changed elsewhere: {0}")]
    Conflict(String),
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a running page service
#[derive(Debug, Clone)]
pub struct PagesClient {
    http: Client,
    base_url: String,
}

impl PagesClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// `base_url` is the service root, e.g. `http://127.0.0.1:3030`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("pagecraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/pages{}", self.base_url, path)
    }

    pub async fn list(&self) -> Result<Vec<PageRecord>, ClientError> {
        send(self.http.get(self.url(""))).await
    }

    pub async fn get(&self, id: &str) -> Result<PageRecord, ClientError> {
        send(self.http.get(self.url(&format!("/{}", id)))).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PageRecord, ClientError> {
        send(self.http.get(self.url(&format!("/slug/{}", slug)))).await
    }

    pub async fn create(&self, page: &NewPage) -> Result<PageRecord, ClientError> {
        send(self.http.post(self.url("")).json(page)).await
    }

    pub async fn update(&self, id: &str, update: &PageUpdate) -> Result<PageRecord, ClientError> {
        send(self.http.put(self.url(&format!("/{}", id))).json(update)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = send(self.http.delete(self.url(&format!("/{}", id)))).await?;
        Ok(())
    }

    pub async fn set_status(&self, id: &str, status: PageStatus) -> Result<PageRecord, ClientError> {
        let body = StatusChange {
            status: status.to_string(),
        };
        send(self.http.patch(self.url(&format!("/{}/status", id))).json(&body)).await
    }

    pub async fn versions(&self, id: &str) -> Result<Vec<PageRevision>, ClientError> {
        send(self.http.get(self.url(&format!("/{}/versions", id)))).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let res = request.send().await.map_err(map_reqwest_error)?;
    let status = res.status();

    if status.is_success() {
        return res
            .json::<T>()
            .await
            .map_err(|e| ClientError::Serde(e.to_string()));
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    debug!(status = status.as_u16(), %message, "Page service returned an error");

    match status {
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
        StatusCode::CONFLICT => Err(ClientError::Conflict(message)),
        s => Err(ClientError::Http {
            status: s.as_u16(),
            message,
        }),
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(e.to_string())
    }
}

/// Title and slug used when a session's page has never been saved
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub title: String,
    pub slug: String,
}

impl PageDraft {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
        }
    }

    fn into_new_page(self, page: PageData) -> NewPage {
        NewPage::new(self.title, self.slug).with_page(page)
    }
}

/// Save a session's page through the service.
///
/// Pages with a known revision are updated conditionally on that version;
/// others are created from `draft`. Cancelling `cancel` (the editor being
/// closed) aborts the request, closes the session and discards the result.
pub async fn save_session(
    session: &mut EditSession,
    client: &PagesClient,
    draft: &PageDraft,
    cancel: &CancellationToken,
) -> Result<SaveOutcome, EditorError> {
    let ticket = session.begin_save()?;

    let request = async {
        let record = match &ticket.base {
            Some(base) => {
                let update = PageUpdate::content(ticket.page.clone(), Some(base.version));
                client.update(&base.page_id, &update).await?
            }
            None => {
                let new_page = draft.clone().into_new_page(ticket.page.clone());
                client.create(&new_page).await?
            }
        };
        Ok::<_, ClientError>(SavedRevision::new(record.id, record.version))
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!(session_id = %session.id, "Save cancelled");
            session.close();
            Err(ClientError::Cancelled)
        }
        result = request => result,
    };

    session.complete_save(ticket, result)
}
