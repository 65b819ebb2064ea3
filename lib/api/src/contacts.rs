//! Contact spreadsheet upload and the contacts list.

use crate::error::ApiError;
use agentdesk_core::{AgentId, ContactId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spreadsheet extensions the backend parser accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// A contacts spreadsheet held in memory for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSheet {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ContactSheet {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Returns true if the extension is one the backend can parse.
    #[must_use]
    pub fn has_accepted_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// MIME type sent with the multipart part.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("csv") => "text/csv",
            Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Some("xls") => "application/vnd.ms-excel",
            _ => "application/octet-stream",
        }
    }
}

/// Success body of `PUT /api/calls`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadedContacts {
    #[serde(default)]
    pub uploaded_contacts: Vec<ContactId>,
}

/// A contact as listed by `GET /api/contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(alias = "_id")]
    pub id: ContactId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Contact endpoints.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// `PUT /api/calls` (multipart): uploads the sheet for the agent and
    /// returns the ids of the contacts the backend parsed from it.
    async fn upload_contacts(
        &self,
        agent_id: &AgentId,
        sheet: &ContactSheet,
    ) -> Result<Vec<ContactId>, ApiError>;

    /// `GET /api/contacts`
    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError>;
}
