//! Campaigns page.

use crate::error::DashboardError;
use agentdesk_api::{CampaignsApi, NewCampaign};
use agentdesk_core::CampaignId;
use agentdesk_crm::{Campaign, CampaignControl, CampaignStatus};
use rootcause::prelude::Report;
use tracing::{info, instrument};

/// Campaign list with start/pause/resume/cancel controls.
pub struct CampaignBoard<A> {
    api: A,
    campaigns: Vec<Campaign>,
}

impl<A: CampaignsApi> CampaignBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            campaigns: Vec::new(),
        }
    }

    #[must_use]
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Campaigns in the given status.
    #[must_use]
    pub fn with_status(&self, status: CampaignStatus) -> Vec<&Campaign> {
        self.campaigns.iter().filter(|c| c.status == status).collect()
    }

    pub async fn load(&mut self) -> Result<(), Report<DashboardError>> {
        self.campaigns = self
            .api
            .list_campaigns()
            .await
            .map_err(DashboardError::request("load campaigns"))?;
        Ok(())
    }

    pub async fn create(
        &mut self,
        campaign: &NewCampaign,
    ) -> Result<CampaignId, Report<DashboardError>> {
        if campaign.name.trim().is_empty() {
            return Err(DashboardError::Rejected {
                details: "campaign name is required".to_string(),
            }
            .into());
        }
        let created = self
            .api
            .create_campaign(campaign)
            .await
            .map_err(DashboardError::request("create campaign"))?;
        let id = created.id.clone();
        self.campaigns.insert(0, created);
        Ok(id)
    }

    /// Sends a control action. Actions the campaign's status does not allow
    /// are refused without a request.
    #[instrument(skip(self, id, control), fields(campaign_id = %id, control = %control))]
    pub async fn control(
        &mut self,
        id: &CampaignId,
        control: CampaignControl,
    ) -> Result<(), Report<DashboardError>> {
        let position = self
            .campaigns
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| DashboardError::not_loaded("campaign", id))?;
        self.campaigns[position]
            .check_control(control)
            .map_err(|e| DashboardError::Rejected {
                details: e.to_string(),
            })?;

        let updated = self
            .api
            .control_campaign(id, control)
            .await
            .map_err(DashboardError::request("control campaign"))?;
        info!(status = %updated.status, "campaign status changed");
        self.campaigns[position] = updated;
        Ok(())
    }
}
