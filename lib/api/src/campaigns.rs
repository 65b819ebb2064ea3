//! Campaign endpoints.

use crate::error::ApiError;
use agentdesk_core::{AgentId, CampaignId, ContactId, Result};
use agentdesk_crm::{Campaign, CampaignControl};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/campaigns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub name: String,
    pub agent_id: AgentId,
    /// Contacts the campaign will call.
    pub contact_ids: Vec<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ControlBody {
    pub action: CampaignControl,
}

/// Campaign endpoints.
#[async_trait]
pub trait CampaignsApi: Send + Sync {
    /// `GET /api/campaigns`
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError>;

    /// `POST /api/campaigns`
    async fn create_campaign(&self, campaign: &NewCampaign) -> Result<Campaign, ApiError>;

    /// `POST /api/campaigns/:id/control`
    async fn control_campaign(
        &self,
        id: &CampaignId,
        control: CampaignControl,
    ) -> Result<Campaign, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_campaign_shape() {
        let body = NewCampaign {
            name: "October follow-up".to_string(),
            agent_id: AgentId::new("a1"),
            contact_ids: vec![ContactId::new("c1"), ContactId::new("c2")],
            scheduled_at: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "name": "October follow-up",
                "agentId": "a1",
                "contactIds": ["c1", "c2"]
            })
        );
    }

    #[test]
    fn control_body_shape() {
        let body = ControlBody {
            action: CampaignControl::Start,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"action": "start"})
        );
    }
}
