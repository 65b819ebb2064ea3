//! Knowledge base documents.

use crate::error::ApiError;
use agentdesk_core::{DocumentId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document in the knowledge base agents draw answers from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDocument {
    #[serde(alias = "_id")]
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Processing status reported by the backend (e.g. "processing", "ready").
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /api/knowledge/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Raw file returned by `GET /api/knowledge/:id/download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDownload {
    /// File name from `Content-Disposition`, when the backend sends one.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Extracts the file name from a `Content-Disposition` header value.
#[must_use]
pub fn disposition_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Knowledge base endpoints.
#[async_trait]
pub trait KnowledgeApi: Send + Sync {
    /// `GET /api/knowledge/:id`
    async fn get_document(&self, id: &DocumentId) -> Result<KnowledgeDocument, ApiError>;

    /// `PATCH /api/knowledge/:id`
    async fn update_document(
        &self,
        id: &DocumentId,
        update: &DocumentUpdate,
    ) -> Result<KnowledgeDocument, ApiError>;

    /// `DELETE /api/knowledge/:id`
    async fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError>;

    /// `GET /api/knowledge/:id/download`
    async fn download_document(&self, id: &DocumentId) -> Result<DocumentDownload, ApiError>;
}
