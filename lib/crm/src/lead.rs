//! Leads tracked through pipeline stages.

use agentdesk_core::{CampaignId, LeadId, PipelineId, StageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lead priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the automated call placed to a lead by a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Pending,
    Calling,
    Completed,
    Failed,
}

impl CallStatus {
    /// Returns true once the call will not change again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A prospective contact tracked through a pipeline.
///
/// The backend owns the record; this is the client's copy used for
/// rendering, filtering and optimistic stage moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(alias = "_id")]
    pub id: LeadId,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Estimated deal value.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub source: Option<String>,
    /// Team member the lead is assigned to.
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub pipeline_id: PipelineId,
    pub stage_id: StageId,
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    #[serde(default)]
    pub call_status: Option<CallStatus>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Creates a lead with only the required fields set.
    #[must_use]
    pub fn new(
        id: LeadId,
        name: impl Into<String>,
        pipeline_id: PipelineId,
        stage_id: StageId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            company: None,
            email: None,
            phone: None,
            tags: Vec::new(),
            value: 0.0,
            priority: Priority::default(),
            source: None,
            assigned_to: None,
            pipeline_id,
            stage_id,
            campaign_id: None,
            call_status: None,
            created_at,
        }
    }

    /// Fields the free-text search looks at, in display order.
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.company.as_deref())
            .chain(self.email.as_deref())
            .chain(self.phone.as_deref())
            .chain(self.tags.iter().map(String::as_str))
    }
}
