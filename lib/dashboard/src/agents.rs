//! Agents page.

use crate::error::DashboardError;
use agentdesk_api::{Agent, AgentUpdate, AgentsApi, Voice};
use agentdesk_core::AgentId;
use agentdesk_crm::apply_optimistic;
use rootcause::prelude::Report;
use tracing::{info, instrument};

/// Agents and the voices they can use.
pub struct AgentsView<A> {
    api: A,
    agents: Vec<Agent>,
    voices: Vec<Voice>,
}

impl<A: AgentsApi> AgentsView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            agents: Vec::new(),
            voices: Vec::new(),
        }
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// The voice an agent speaks with, if it is in the voice list.
    #[must_use]
    pub fn voice_of(&self, agent: &Agent) -> Option<&Voice> {
        let voice_id = agent.voice_id.as_ref()?;
        self.voices.iter().find(|v| &v.id == voice_id)
    }

    /// Fetches agents and voices together.
    pub async fn load(&mut self) -> Result<(), Report<DashboardError>> {
        let (agents, voices) = futures::try_join!(
            async {
                self.api
                    .list_agents()
                    .await
                    .map_err(DashboardError::request("load agents"))
            },
            async {
                self.api
                    .list_voices()
                    .await
                    .map_err(DashboardError::request("load voices"))
            },
        )?;
        self.agents = agents;
        self.voices = voices;
        Ok(())
    }

    /// Turns an agent on or off. The switch flips at once and flips back if
    /// the backend refuses.
    #[instrument(skip(self))]
    pub async fn set_active(
        &mut self,
        id: &AgentId,
        is_active: bool,
    ) -> Result<(), Report<DashboardError>> {
        let position = self.position(id)?;
        let update = AgentUpdate::active(is_active);
        let updated = apply_optimistic(
            &mut self.agents,
            |agents| agents[position].is_active = is_active,
            self.api.update_agent(id, &update),
        )
        .await
        .map_err(DashboardError::request("update agent"))?;
        self.agents[position] = updated;
        Ok(())
    }

    /// Flips the active flag.
    pub async fn toggle_active(&mut self, id: &AgentId) -> Result<bool, Report<DashboardError>> {
        let position = self.position(id)?;
        let next = !self.agents[position].is_active;
        self.set_active(id, next).await?;
        Ok(next)
    }

    pub async fn update(
        &mut self,
        id: &AgentId,
        update: &AgentUpdate,
    ) -> Result<(), Report<DashboardError>> {
        let position = self.position(id)?;
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DashboardError::Rejected {
                details: "agent name cannot be empty".to_string(),
            }
            .into());
        }
        let updated = self
            .api
            .update_agent(id, update)
            .await
            .map_err(DashboardError::request("update agent"))?;
        self.agents[position] = updated;
        Ok(())
    }

    pub async fn delete(&mut self, id: &AgentId) -> Result<(), Report<DashboardError>> {
        self.position(id)?;
        self.api
            .delete_agent(id)
            .await
            .map_err(DashboardError::request("delete agent"))?;
        self.agents.retain(|a| &a.id != id);
        info!(agent_id = %id, "agent deleted");
        Ok(())
    }

    fn position(&self, id: &AgentId) -> Result<usize, DashboardError> {
        self.agents
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| DashboardError::not_loaded("agent", id))
    }
}
