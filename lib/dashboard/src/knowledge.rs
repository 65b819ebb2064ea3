//! Knowledge base document page.

use crate::error::DashboardError;
use agentdesk_api::{DocumentDownload, DocumentUpdate, KnowledgeApi, KnowledgeDocument};
use agentdesk_core::DocumentId;
use rootcause::prelude::Report;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::info;

/// Documents opened in this session, keyed by id.
pub struct KnowledgeBase<A> {
    api: A,
    documents: BTreeMap<DocumentId, KnowledgeDocument>,
}

impl<A: KnowledgeApi> KnowledgeBase<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            documents: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn document(&self, id: &DocumentId) -> Option<&KnowledgeDocument> {
        self.documents.get(id)
    }

    /// Fetches a document, replacing any cached copy.
    pub async fn open(
        &mut self,
        id: &DocumentId,
    ) -> Result<&KnowledgeDocument, Report<DashboardError>> {
        let document = self
            .api
            .get_document(id)
            .await
            .map_err(DashboardError::request("load document"))?;
        let cached = match self.documents.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(document);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(document),
        };
        Ok(cached)
    }

    pub async fn update(
        &mut self,
        id: &DocumentId,
        update: &DocumentUpdate,
    ) -> Result<(), Report<DashboardError>> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DashboardError::Rejected {
                details: "document title cannot be empty".to_string(),
            }
            .into());
        }
        let updated = self
            .api
            .update_document(id, update)
            .await
            .map_err(DashboardError::request("update document"))?;
        self.documents.insert(id.clone(), updated);
        Ok(())
    }

    pub async fn delete(&mut self, id: &DocumentId) -> Result<(), Report<DashboardError>> {
        self.api
            .delete_document(id)
            .await
            .map_err(DashboardError::request("delete document"))?;
        self.documents.remove(id);
        info!(document_id = %id, "document deleted");
        Ok(())
    }

    /// Downloads the raw file. The file name falls back to the one on the
    /// document record when the response does not carry one.
    pub async fn download(
        &self,
        id: &DocumentId,
    ) -> Result<DocumentDownload, Report<DashboardError>> {
        let mut download = self
            .api
            .download_document(id)
            .await
            .map_err(DashboardError::request("download document"))?;
        if download.file_name.is_none() {
            download.file_name = self
                .documents
                .get(id)
                .map(|d| d.file_name.clone().unwrap_or_else(|| d.title.clone()));
        }
        Ok(download)
    }
}
