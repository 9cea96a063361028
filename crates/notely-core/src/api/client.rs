//! HTTP client for the notes service.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CategoriesApi, NotesApi};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{
    Category, CategoryChanges, CategoryId, NewCategory, NewNote, Note, NoteChanges, NoteFilter,
    NoteId,
};
use crate::util::compact_text;

/// Stateless wrapper around the service's REST endpoints.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Builds a client from resolved configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Sending notes API request");
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(request: RequestBuilder) -> Result<()> {
        check_status(request.send().await?).await?;
        Ok(())
    }
}

impl NotesApi for ApiClient {
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let request = self
            .request(Method::GET, "/notes")
            .query(&filter.query_pairs());
        Self::send_json(request).await
    }

    async fn get_note(&self, id: &NoteId) -> Result<Note> {
        Self::send_json(self.request(Method::GET, &format!("/notes/{id}"))).await
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        Self::send_json(self.request(Method::POST, "/notes").json(note)).await
    }

    async fn update_note(&self, id: &NoteId, changes: &NoteChanges) -> Result<Note> {
        let request = self.request(Method::PUT, &format!("/notes/{id}")).json(changes);
        Self::send_json(request).await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/notes/{id}"))).await
    }

    async fn archive_note(&self, id: &NoteId) -> Result<Note> {
        Self::send_json(self.request(Method::PATCH, &format!("/notes/{id}/archive"))).await
    }

    async fn unarchive_note(&self, id: &NoteId) -> Result<Note> {
        Self::send_json(self.request(Method::PATCH, &format!("/notes/{id}/unarchive"))).await
    }

    async fn add_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note> {
        let path = format!("/notes/{note_id}/categories/{category_id}");
        Self::send_json(self.request(Method::POST, &path)).await
    }

    async fn remove_category(&self, note_id: &NoteId, category_id: &CategoryId) -> Result<Note> {
        let path = format!("/notes/{note_id}/categories/{category_id}");
        Self::send_json(self.request(Method::DELETE, &path)).await
    }
}

impl CategoriesApi for ApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        Self::send_json(self.request(Method::GET, "/categories")).await
    }

    async fn get_category(&self, id: &CategoryId) -> Result<Category> {
        Self::send_json(self.request(Method::GET, &format!("/categories/{id}"))).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        Self::send_json(self.request(Method::POST, "/categories").json(category)).await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        changes: &CategoryChanges,
    ) -> Result<Category> {
        let request = self
            .request(Method::PUT, &format!("/categories/{id}"))
            .json(changes);
        Self::send_json(request).await
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("/categories/{id}"))).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "Notes API returned an error status");
    Err(Error::Api {
        status: status.as_u16(),
        message: parse_api_error(status, &body),
    })
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<ErrorDetail>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    msg: String,
    #[serde(default)]
    loc: Vec<serde_json::Value>,
}

impl ValidationIssue {
    fn render(&self) -> String {
        let field = self
            .loc
            .iter()
            .filter(|part| part.as_str() != Some("body"))
            .map(|part| match part {
                serde_json::Value::String(name) => name.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        if field.is_empty() {
            self.msg.clone()
        } else {
            format!("{field}: {}", self.msg)
        }
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorResponse>(body) {
        let message = match payload.detail {
            Some(ErrorDetail::Message(message)) => Some(message),
            Some(ErrorDetail::Validation(issues)) if !issues.is_empty() => Some(
                issues
                    .iter()
                    .map(ValidationIssue::render)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => payload.message.or(payload.error),
        };
        if let Some(message) = message {
            return compact_text(&message);
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
    } else {
        trimmed
    }
}
