//! Leads endpoints.

use crate::error::ApiError;
use agentdesk_core::{CampaignId, ContactId, LeadId, PipelineId, Result, StageId};
use agentdesk_crm::{Lead, Priority};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Source label the backend records for leads created from an upload.
pub const IMPORT_SOURCE: &str = "Import";

/// Body of `POST /api/leads`.
///
/// A lead is either entered by hand (name and contact fields set) or
/// created from an uploaded contact (`contact_id` set, the backend copies
/// the contact's fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub pipeline_id: PipelineId,
    pub stage_id: StageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<CampaignId>,
}

impl NewLead {
    /// A hand-entered lead.
    #[must_use]
    pub fn manual(name: impl Into<String>, pipeline_id: PipelineId, stage_id: StageId) -> Self {
        Self {
            name: Some(name.into()),
            email: None,
            phone: None,
            company: None,
            value: None,
            priority: Priority::default(),
            source: None,
            tags: Vec::new(),
            pipeline_id,
            stage_id,
            contact_id: None,
            campaign_id: None,
        }
    }

    /// A lead created from an uploaded contact.
    #[must_use]
    pub fn from_contact(contact_id: ContactId, pipeline_id: PipelineId, stage_id: StageId) -> Self {
        Self {
            name: None,
            email: None,
            phone: None,
            company: None,
            value: None,
            priority: Priority::default(),
            source: Some(IMPORT_SOURCE.to_string()),
            tags: Vec::new(),
            pipeline_id,
            stage_id,
            contact_id: Some(contact_id),
            campaign_id: None,
        }
    }
}

/// Query parameters of `GET /api/leads`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<PipelineId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<StageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<CampaignId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl LeadQuery {
    /// Leads of one pipeline.
    #[must_use]
    pub fn pipeline(pipeline_id: PipelineId) -> Self {
        Self {
            pipeline_id: Some(pipeline_id),
            ..Self::default()
        }
    }

    /// Query pairs in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.pipeline_id {
            pairs.push(("pipelineId", id.to_string()));
        }
        if let Some(id) = &self.stage_id {
            pairs.push(("stageId", id.to_string()));
        }
        if let Some(id) = &self.campaign_id {
            pairs.push(("campaignId", id.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Body of `PATCH /api/leads/:id/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadMove {
    pub stage_id: StageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<PipelineId>,
}

/// Leads endpoints.
#[async_trait]
pub trait LeadsApi: Send + Sync {
    /// `GET /api/leads`
    async fn list_leads(&self, query: &LeadQuery) -> Result<Vec<Lead>, ApiError>;

    /// `POST /api/leads`
    async fn create_lead(&self, lead: &NewLead) -> Result<Lead, ApiError>;

    /// `PATCH /api/leads/:id/move`
    async fn move_lead(&self, id: &LeadId, to: &LeadMove) -> Result<Lead, ApiError>;
}
