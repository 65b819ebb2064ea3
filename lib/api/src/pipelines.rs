//! Pipelines and stages endpoints.

use crate::error::ApiError;
use agentdesk_core::{PipelineId, Result, StageId};
use agentdesk_crm::{Pipeline, Stage, StageOrder};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/pipelines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPipeline {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial stages; the backend creates its default set when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageDraft>,
}

/// Body of `PATCH /api/pipelines/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Stage fields sent when adding or editing a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDraft {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl StageDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            order: None,
        }
    }
}

/// Pipelines and stages endpoints.
#[async_trait]
pub trait PipelinesApi: Send + Sync {
    /// `GET /api/pipelines`
    async fn list_pipelines(&self) -> Result<Vec<Pipeline>, ApiError>;

    /// `POST /api/pipelines`
    async fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Pipeline, ApiError>;

    /// `PATCH /api/pipelines/:id`
    async fn update_pipeline(
        &self,
        id: &PipelineId,
        update: &PipelineUpdate,
    ) -> Result<Pipeline, ApiError>;

    /// `PATCH /api/pipelines/:id/reorder` with the full stage order.
    async fn reorder_stages(
        &self,
        id: &PipelineId,
        order: &[StageOrder],
    ) -> Result<Vec<Stage>, ApiError>;

    /// `PATCH /api/pipelines/:id/default`
    async fn set_default_pipeline(&self, id: &PipelineId) -> Result<Pipeline, ApiError>;

    /// `POST /api/pipelines/:id/stages`
    async fn add_stage(&self, id: &PipelineId, stage: &StageDraft) -> Result<Vec<Stage>, ApiError>;

    /// `PATCH /api/pipelines/:id/stages/:stageId`
    async fn update_stage(
        &self,
        id: &PipelineId,
        stage_id: &StageId,
        stage: &StageDraft,
    ) -> Result<Vec<Stage>, ApiError>;

    /// `DELETE /api/pipelines/:id/stages/:stageId`
    async fn delete_stage(&self, id: &PipelineId, stage_id: &StageId)
    -> Result<Vec<Stage>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pipeline_omits_empty_stages() {
        let body = NewPipeline {
            name: "Restaurants".to_string(),
            description: None,
            stages: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"name": "Restaurants"})
        );
    }

    #[test]
    fn stage_draft_shape() {
        let draft = StageDraft::new("Qualified", "#10b981");
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"name": "Qualified", "color": "#10b981"})
        );
    }
}
