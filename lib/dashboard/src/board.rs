//! Pipeline board: pipelines, their stages, and the leads of the selected
//! pipeline laid out as kanban columns.
//!
//! Stage reorders and lead moves are applied locally before the backend
//! confirms them and rolled back if it refuses. Both take `&mut self`, so a
//! second reorder cannot start while the first is awaiting its response.

use crate::error::DashboardError;
use agentdesk_api::{
    LeadMove, LeadQuery, LeadsApi, NewLead, NewPipeline, PipelineUpdate, PipelinesApi, StageDraft,
};
use agentdesk_core::{LeadId, PipelineId, StageId};
use agentdesk_crm::{
    Lead, LeadFilter, Pipeline, StageColumn, StageOrder, apply_optimistic, group_by_stage,
    reorder_stages,
};
use chrono::{DateTime, Utc};
use rootcause::prelude::Report;
use tracing::{debug, info, instrument, warn};

/// Client-side state of the pipelines page.
pub struct PipelineBoard<A> {
    api: A,
    pipelines: Vec<Pipeline>,
    selected: Option<PipelineId>,
    leads: Vec<Lead>,
    filter: LeadFilter,
}

impl<A: PipelinesApi + LeadsApi> PipelineBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            pipelines: Vec::new(),
            selected: None,
            leads: Vec::new(),
            filter: LeadFilter::default(),
        }
    }

    #[must_use]
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Pipeline> {
        let id = self.selected.as_ref()?;
        self.pipelines.iter().find(|p| &p.id == id)
    }

    /// Leads of the selected pipeline, unfiltered.
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    #[must_use]
    pub fn filter(&self) -> &LeadFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: LeadFilter) {
        self.filter = filter;
    }

    /// Fetches all pipelines.
    ///
    /// Keeps the current selection if it still exists, otherwise selects
    /// the default pipeline (or the first one).
    pub async fn load_pipelines(&mut self) -> Result<(), Report<DashboardError>> {
        let pipelines = self
            .api
            .list_pipelines()
            .await
            .map_err(DashboardError::request("load pipelines"))?;
        self.pipelines = pipelines;

        let still_there = self
            .selected
            .as_ref()
            .is_some_and(|id| self.pipelines.iter().any(|p| &p.id == id));
        if !still_there {
            self.selected = self
                .pipelines
                .iter()
                .find(|p| p.is_default)
                .or_else(|| self.pipelines.first())
                .map(|p| p.id.clone());
            self.leads.clear();
        }
        debug!(count = self.pipelines.len(), selected = ?self.selected, "pipelines loaded");
        Ok(())
    }

    /// Switches to another pipeline and loads its leads.
    pub async fn select(&mut self, id: &PipelineId) -> Result<(), Report<DashboardError>> {
        if !self.pipelines.iter().any(|p| &p.id == id) {
            return Err(DashboardError::not_loaded("pipeline", id).into());
        }
        self.selected = Some(id.clone());
        self.leads.clear();
        self.load_leads().await
    }

    /// Fetches the leads of the selected pipeline.
    pub async fn load_leads(&mut self) -> Result<(), Report<DashboardError>> {
        let id = self
            .selected
            .clone()
            .ok_or(DashboardError::NoPipelineSelected)?;
        self.leads = self
            .api
            .list_leads(&LeadQuery::pipeline(id))
            .await
            .map_err(DashboardError::request("load leads"))?;
        Ok(())
    }

    /// Creates a pipeline and selects it.
    #[instrument(skip(self, pipeline), fields(name = %pipeline.name))]
    pub async fn create_pipeline(
        &mut self,
        pipeline: &NewPipeline,
    ) -> Result<PipelineId, Report<DashboardError>> {
        if pipeline.name.trim().is_empty() {
            return Err(DashboardError::Rejected {
                details: "pipeline name is required".to_string(),
            }
            .into());
        }
        let created = self
            .api
            .create_pipeline(pipeline)
            .await
            .map_err(DashboardError::request("create pipeline"))?;
        let id = created.id.clone();
        self.pipelines.push(created);
        self.selected = Some(id.clone());
        self.leads.clear();
        info!(pipeline_id = %id, "pipeline created");
        Ok(id)
    }

    pub async fn rename_pipeline(
        &mut self,
        id: &PipelineId,
        name: &str,
    ) -> Result<(), Report<DashboardError>> {
        let index = self.index_of(id)?;
        let update = PipelineUpdate {
            name: Some(name.trim().to_string()),
            description: None,
        };
        let updated = self
            .api
            .update_pipeline(id, &update)
            .await
            .map_err(DashboardError::request("rename pipeline"))?;
        self.pipelines[index] = updated;
        Ok(())
    }

    /// Marks one pipeline as the default; all others lose the flag.
    pub async fn set_default(&mut self, id: &PipelineId) -> Result<(), Report<DashboardError>> {
        self.index_of(id)?;
        self.api
            .set_default_pipeline(id)
            .await
            .map_err(DashboardError::request("set default pipeline"))?;
        for pipeline in &mut self.pipelines {
            pipeline.is_default = &pipeline.id == id;
        }
        Ok(())
    }

    pub async fn add_stage(&mut self, stage: &StageDraft) -> Result<(), Report<DashboardError>> {
        let index = self.selected_index()?;
        let id = self.pipelines[index].id.clone();
        let stages = self
            .api
            .add_stage(&id, stage)
            .await
            .map_err(DashboardError::request("add stage"))?;
        let pipeline = &mut self.pipelines[index];
        pipeline.stages = stages;
        pipeline.sort_stages();
        Ok(())
    }

    pub async fn update_stage(
        &mut self,
        stage_id: &StageId,
        stage: &StageDraft,
    ) -> Result<(), Report<DashboardError>> {
        let index = self.selected_index()?;
        let pipeline = &self.pipelines[index];
        if pipeline.stage(stage_id).is_none() {
            return Err(DashboardError::not_loaded("stage", stage_id).into());
        }
        let id = pipeline.id.clone();
        let stages = self
            .api
            .update_stage(&id, stage_id, stage)
            .await
            .map_err(DashboardError::request("update stage"))?;
        let pipeline = &mut self.pipelines[index];
        pipeline.stages = stages;
        pipeline.sort_stages();
        Ok(())
    }

    /// Deletes a stage; the remaining stages are renumbered from 0.
    pub async fn delete_stage(&mut self, stage_id: &StageId) -> Result<(), Report<DashboardError>> {
        let index = self.selected_index()?;
        let pipeline = &self.pipelines[index];
        if pipeline.stage(stage_id).is_none() {
            return Err(DashboardError::not_loaded("stage", stage_id).into());
        }
        let id = pipeline.id.clone();
        let stages = self
            .api
            .delete_stage(&id, stage_id)
            .await
            .map_err(DashboardError::request("delete stage"))?;
        let pipeline = &mut self.pipelines[index];
        pipeline.stages = stages;
        pipeline.sort_stages();
        pipeline.normalize_order();
        Ok(())
    }

    /// Moves the stage at `from` to `to` in the selected pipeline.
    ///
    /// The new order is shown immediately and the full order list is
    /// submitted. If the backend refuses, the stages are restored to their
    /// order before the drag.
    #[instrument(skip(self))]
    pub async fn reorder_stage(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<(), Report<DashboardError>> {
        let index = self.selected_index()?;
        let pipeline = &mut self.pipelines[index];
        let reordered =
            reorder_stages(&pipeline.stages, from, to).map_err(|e| DashboardError::Rejected {
                details: e.to_string(),
            })?;
        if reordered == pipeline.stages {
            return Ok(());
        }

        let order: Vec<StageOrder> = reordered
            .iter()
            .map(|s| StageOrder {
                stage_id: s.id.clone(),
                order: s.order,
            })
            .collect();
        let pipeline_id = pipeline.id.clone();

        let stages = apply_optimistic(
            &mut pipeline.stages,
            |stages| *stages = reordered,
            self.api.reorder_stages(&pipeline_id, &order),
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "stage reorder rejected, restored previous order");
            DashboardError::request("reorder stages")(e)
        })?;
        pipeline.stages = stages;
        pipeline.sort_stages();
        Ok(())
    }

    /// Adds a lead by hand to the selected pipeline.
    pub async fn add_lead(&mut self, lead: &NewLead) -> Result<LeadId, Report<DashboardError>> {
        if lead.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(DashboardError::Rejected {
                details: "lead name is required".to_string(),
            }
            .into());
        }
        let created = self
            .api
            .create_lead(lead)
            .await
            .map_err(DashboardError::request("create lead"))?;
        let id = created.id.clone();
        if self.selected.as_ref() == Some(&created.pipeline_id) {
            self.leads.push(created);
        }
        Ok(id)
    }

    /// Moves a lead to another stage of the selected pipeline.
    ///
    /// The card moves immediately and moves back if the backend refuses.
    #[instrument(skip(self, lead_id, stage_id), fields(lead_id = %lead_id, stage_id = %stage_id))]
    pub async fn move_lead(
        &mut self,
        lead_id: &LeadId,
        stage_id: &StageId,
    ) -> Result<(), Report<DashboardError>> {
        let index = self.selected_index()?;
        let pipeline = &self.pipelines[index];
        if pipeline.stage(stage_id).is_none() {
            return Err(DashboardError::not_loaded("stage", stage_id).into());
        }
        let position = self
            .leads
            .iter()
            .position(|l| &l.id == lead_id)
            .ok_or_else(|| DashboardError::not_loaded("lead", lead_id))?;
        if &self.leads[position].stage_id == stage_id {
            return Ok(());
        }

        let request = LeadMove {
            stage_id: stage_id.clone(),
            pipeline_id: Some(pipeline.id.clone()),
        };
        let moved = apply_optimistic(
            &mut self.leads,
            |leads| leads[position].stage_id = stage_id.clone(),
            self.api.move_lead(lead_id, &request),
        )
        .await
        .map_err(DashboardError::request("move lead"))?;
        self.leads[position] = moved;
        Ok(())
    }

    /// Leads passing the current filter.
    #[must_use]
    pub fn visible_leads(&self, now: DateTime<Utc>) -> Vec<&Lead> {
        self.filter.apply(&self.leads, now)
    }

    /// Kanban columns of the selected pipeline over the visible leads.
    #[must_use]
    pub fn columns(&self, now: DateTime<Utc>) -> Vec<StageColumn<'_>> {
        let Some(pipeline) = self.selected() else {
            return Vec::new();
        };
        let visible = self.visible_leads(now);
        group_by_stage(&pipeline.stages, &visible)
    }

    fn index_of(&self, id: &PipelineId) -> Result<usize, DashboardError> {
        self.pipelines
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| DashboardError::not_loaded("pipeline", id))
    }

    fn selected_index(&self) -> Result<usize, DashboardError> {
        let id = self
            .selected
            .as_ref()
            .ok_or(DashboardError::NoPipelineSelected)?;
        self.index_of(id)
    }
}
