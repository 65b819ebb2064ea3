//! Outbound call campaigns.

use crate::error::CrmError;
use agentdesk_core::{AgentId, CampaignId};
use chrono::{DateTime, Utc};
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    InProgress,
    Completed,
    Paused,
    Cancelled,
}

impl CampaignStatus {
    /// Returns true if the campaign can no longer be controlled.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action sent to `POST /api/campaigns/:id/control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignControl {
    Start,
    Pause,
    Resume,
    Cancel,
}

impl CampaignControl {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
        }
    }

    /// Returns true if this action is valid for a campaign in `status`.
    #[must_use]
    pub fn allowed_from(&self, status: CampaignStatus) -> bool {
        use CampaignStatus::*;
        match self {
            Self::Start => matches!(status, Draft | Scheduled),
            Self::Pause => matches!(status, InProgress),
            Self::Resume => matches!(status, Paused),
            Self::Cancel => matches!(status, Draft | Scheduled | InProgress | Paused),
        }
    }

    /// Status the backend moves the campaign to on success.
    #[must_use]
    pub fn resulting_status(&self) -> CampaignStatus {
        match self {
            Self::Start | Self::Resume => CampaignStatus::InProgress,
            Self::Pause => CampaignStatus::Paused,
            Self::Cancel => CampaignStatus::Cancelled,
        }
    }
}

impl fmt::Display for CampaignControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch of automated outbound calls made by one agent.
///
/// Call counters are maintained by the backend and only displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(alias = "_id")]
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub total_calls: u32,
    #[serde(default)]
    pub completed_calls: u32,
    #[serde(default)]
    pub successful_calls: u32,
    #[serde(default)]
    pub failed_calls: u32,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Percentage of calls completed, 0 when nothing is scheduled.
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        if self.total_calls == 0 {
            return 0;
        }
        let pct = u64::from(self.completed_calls.min(self.total_calls)) * 100
            / u64::from(self.total_calls);
        pct as u8
    }

    /// Checks that `control` may be sent for this campaign.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::InvalidControl` when the status does not allow it.
    pub fn check_control(&self, control: CampaignControl) -> Result<(), Report<CrmError>> {
        if control.allowed_from(self.status) {
            Ok(())
        } else {
            Err(CrmError::InvalidControl {
                status: self.status,
                control,
            }
            .into())
        }
    }
}
