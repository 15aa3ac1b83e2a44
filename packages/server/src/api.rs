use crate::record::{NewPage, PageStatus, PageUpdate, StatusChange};
use crate::store::{PageStore, StoreError};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use pagecraft_model::Breakpoint;
use pagecraft_renderer::{preview_html, HtmlOptions};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, instrument};

pub type AppState = Arc<PageStore>;

/// Errors returned by HTTP handlers, rendered as `{ "error": message }`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(err) => match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Validation(_)
                | StoreError::SlugTaken(_)
                | StoreError::InvalidTree(_) => StatusCode::BAD_REQUEST,
                StoreError::VersionConflict { .. } => StatusCode::CONFLICT,
                StoreError::Io(_) | StoreError::Corrupt { .. } | StoreError::Serialize(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Routes under `/api/pages`
pub fn router(store: AppState) -> Router {
    Router::new()
        .route("/api/pages", get(list_pages).post(create_page))
        .route("/api/pages/slug/:slug", get(get_page_by_slug))
        .route(
            "/api/pages/:id",
            get(get_page).put(update_page).delete(delete_page),
        )
        .route("/api/pages/:id/status", patch(update_status))
        .route("/api/pages/:id/versions", get(list_versions))
        .route("/api/pages/:id/preview", get(preview_page))
        .with_state(store)
}

async fn list_pages(State(store): State<AppState>) -> impl IntoResponse {
    Json(store.list().await)
}

async fn get_page(State(store): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    Ok(Json(store.get(&id).await?).into_response())
}

async fn get_page_by_slug(
    State(store): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Response> {
    Ok(Json(store.get_by_slug(&slug).await?).into_response())
}

#[instrument(skip(store, payload))]
async fn create_page(
    State(store): State<AppState>,
    payload: Result<Json<NewPage>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(new_page) = payload?;
    let record = store.create(new_page).await?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

#[instrument(skip(store, payload))]
async fn update_page(
    State(store): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PageUpdate>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(update) = payload?;
    let record = store.update(&id, update).await?;
    Ok(Json(record).into_response())
}

#[instrument(skip(store))]
async fn delete_page(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    store.delete(&id).await?;
    Ok(Json(json!({ "success": true })).into_response())
}

#[instrument(skip(store, payload))]
async fn update_status(
    State(store): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusChange>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(change) = payload?;
    let status: PageStatus = change
        .status
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid status".to_string()))?;
    let record = store.set_status(&id, status).await?;
    Ok(Json(record).into_response())
}

async fn list_versions(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    Ok(Json(store.versions(&id).await?).into_response())
}

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    breakpoint: Option<String>,
}

#[instrument(skip(store))]
async fn preview_page(
    State(store): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Response> {
    let breakpoint = match query.breakpoint.as_deref() {
        Some(raw) => raw
            .parse::<Breakpoint>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => Breakpoint::default(),
    };

    let record = store.get(&id).await?;
    let html = preview_html(&record.page, breakpoint, &HtmlOptions::default());
    Ok(Html(html).into_response())
}
