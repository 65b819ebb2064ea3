//! Read-only analytics and conversation history.

use crate::error::ApiError;
use agentdesk_core::{AgentId, ConversationId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headline numbers of the analytics dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    /// Average call length in seconds.
    pub average_duration: f64,
    pub total_leads: u64,
    pub active_campaigns: u64,
}

impl AnalyticsSummary {
    /// Successful calls as a percentage of all calls.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.successful_calls as f64 * 100.0 / self.total_calls as f64
    }
}

/// One recorded conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    #[serde(alias = "_id")]
    pub id: ConversationId,
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Read-only dashboard endpoints.
#[async_trait]
pub trait InsightsApi: Send + Sync {
    /// `GET /api/analytics`
    async fn analytics(&self) -> Result<AnalyticsSummary, ApiError>;

    /// `GET /api/conversations`
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ApiError>;
}
