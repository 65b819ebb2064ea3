//! reqwest implementation of the dashboard API traits.

use crate::agents::{Agent, AgentUpdate, AgentsApi, Voice};
use crate::campaigns::{CampaignsApi, ControlBody, NewCampaign};
use crate::config::ApiConfig;
use crate::contacts::{Contact, ContactSheet, ContactsApi, UploadedContacts};
use crate::envelope::{error_message, unwrap_field};
use crate::error::ApiError;
use crate::insights::{AnalyticsSummary, ConversationSummary, InsightsApi};
use crate::kitchen::{KitchenApi, MenuItem, MenuItemUpdate, Order, OrderUpdate};
use crate::knowledge::{
    DocumentDownload, DocumentUpdate, KnowledgeApi, KnowledgeDocument, disposition_file_name,
};
use crate::leads::{LeadMove, LeadQuery, LeadsApi, NewLead};
use crate::pipelines::{NewPipeline, PipelineUpdate, PipelinesApi, StageDraft};
use agentdesk_core::{
    AgentId, CampaignId, ContactId, DocumentId, LeadId, MenuItemId, OrderId, PipelineId, Result,
    StageId,
};
use agentdesk_crm::{Campaign, CampaignControl, Lead, Pipeline, Stage, StageOrder};
use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

/// Dashboard API client over HTTP.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    stages: &'a [StageOrder],
}

impl HttpDashboardApi {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if the base URL is blank or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.normalized_base_url();
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfig {
                details: "base_url is empty".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::InvalidConfig {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and turns transport failures and non-2xx statuses
    /// into `ApiError`.
    async fn execute(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        debug!(method, path, "sending request");
        let response = request.send().await.map_err(|e| {
            warn!(method, path, error = %e, "request failed before a response");
            ApiError::Transport {
                method,
                path: path.to_string(),
                details: e.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<JsonValue>()
            .await
            .ok()
            .as_ref()
            .and_then(error_message);
        warn!(method, path, status = status.as_u16(), message = ?message, "request rejected");
        Err(ApiError::Status {
            method,
            path: path.to_string(),
            status: status.as_u16(),
            message,
        }
        .into())
    }

    /// Sends a request and decodes `key` from the JSON envelope.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
        key: &str,
    ) -> Result<T, ApiError> {
        let response = self.execute(method, path, request).await?;
        let body = response
            .json::<JsonValue>()
            .await
            .map_err(|e| ApiError::Decode {
                path: path.to_string(),
                details: e.to_string(),
            })?;
        Ok(unwrap_field(body, key).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            details: e.to_string(),
        })?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path));
        self.fetch("GET", path, request, key).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        key: &str,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        self.fetch("POST", path, request, key).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        key: &str,
    ) -> Result<T, ApiError> {
        let request = self.client.patch(self.url(path)).json(body);
        self.fetch("PATCH", path, request, key).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(path));
        self.execute("DELETE", path, request).await?;
        Ok(())
    }

    async fn delete_returning<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> Result<T, ApiError> {
        let request = self.client.delete(self.url(path));
        self.fetch("DELETE", path, request, key).await
    }
}

#[async_trait]
impl AgentsApi for HttpDashboardApi {
    async fn list_agents(&self) -> Result<Vec<Agent>, ApiError> {
        self.get("/api/agents", "agents").await
    }

    #[instrument(skip(self, update), fields(agent_id = %id))]
    async fn update_agent(&self, id: &AgentId, update: &AgentUpdate) -> Result<Agent, ApiError> {
        self.patch(&format!("/api/agents/{id}"), update, "agent")
            .await
    }

    #[instrument(skip(self), fields(agent_id = %id))]
    async fn delete_agent(&self, id: &AgentId) -> Result<(), ApiError> {
        self.delete(&format!("/api/agents/{id}")).await
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, ApiError> {
        self.get("/api/voices", "voices").await
    }
}

#[async_trait]
impl PipelinesApi for HttpDashboardApi {
    async fn list_pipelines(&self) -> Result<Vec<Pipeline>, ApiError> {
        let mut pipelines: Vec<Pipeline> = self.get("/api/pipelines", "pipelines").await?;
        for pipeline in &mut pipelines {
            pipeline.sort_stages();
        }
        Ok(pipelines)
    }

    #[instrument(skip(self, pipeline), fields(name = %pipeline.name))]
    async fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Pipeline, ApiError> {
        let mut created: Pipeline = self.post("/api/pipelines", pipeline, "pipeline").await?;
        created.sort_stages();
        Ok(created)
    }

    #[instrument(skip(self, update), fields(pipeline_id = %id))]
    async fn update_pipeline(
        &self,
        id: &PipelineId,
        update: &PipelineUpdate,
    ) -> Result<Pipeline, ApiError> {
        let mut updated: Pipeline = self
            .patch(&format!("/api/pipelines/{id}"), update, "pipeline")
            .await?;
        updated.sort_stages();
        Ok(updated)
    }

    #[instrument(skip(self, order), fields(pipeline_id = %id, stages = order.len()))]
    async fn reorder_stages(
        &self,
        id: &PipelineId,
        order: &[StageOrder],
    ) -> Result<Vec<Stage>, ApiError> {
        let body = ReorderBody { stages: order };
        let mut stages: Vec<Stage> = self
            .patch(&format!("/api/pipelines/{id}/reorder"), &body, "stages")
            .await?;
        stages.sort_by_key(|s| s.order);
        Ok(stages)
    }

    #[instrument(skip(self), fields(pipeline_id = %id))]
    async fn set_default_pipeline(&self, id: &PipelineId) -> Result<Pipeline, ApiError> {
        let body = serde_json::json!({ "isDefault": true });
        let mut updated: Pipeline = self
            .patch(&format!("/api/pipelines/{id}/default"), &body, "pipeline")
            .await?;
        updated.sort_stages();
        Ok(updated)
    }

    #[instrument(skip(self, stage), fields(pipeline_id = %id, stage = %stage.name))]
    async fn add_stage(&self, id: &PipelineId, stage: &StageDraft) -> Result<Vec<Stage>, ApiError> {
        let mut stages: Vec<Stage> = self
            .post(&format!("/api/pipelines/{id}/stages"), stage, "stages")
            .await?;
        stages.sort_by_key(|s| s.order);
        Ok(stages)
    }

    #[instrument(skip(self, stage), fields(pipeline_id = %id, stage_id = %stage_id))]
    async fn update_stage(
        &self,
        id: &PipelineId,
        stage_id: &StageId,
        stage: &StageDraft,
    ) -> Result<Vec<Stage>, ApiError> {
        let mut stages: Vec<Stage> = self
            .patch(
                &format!("/api/pipelines/{id}/stages/{stage_id}"),
                stage,
                "stages",
            )
            .await?;
        stages.sort_by_key(|s| s.order);
        Ok(stages)
    }

    #[instrument(skip(self), fields(pipeline_id = %id, stage_id = %stage_id))]
    async fn delete_stage(
        &self,
        id: &PipelineId,
        stage_id: &StageId,
    ) -> Result<Vec<Stage>, ApiError> {
        let mut stages: Vec<Stage> = self
            .delete_returning(&format!("/api/pipelines/{id}/stages/{stage_id}"), "stages")
            .await?;
        stages.sort_by_key(|s| s.order);
        Ok(stages)
    }
}

#[async_trait]
impl LeadsApi for HttpDashboardApi {
    async fn list_leads(&self, query: &LeadQuery) -> Result<Vec<Lead>, ApiError> {
        let path = "/api/leads";
        let request = self.client.get(self.url(path)).query(&query.to_pairs());
        self.fetch("GET", path, request, "leads").await
    }

    async fn create_lead(&self, lead: &NewLead) -> Result<Lead, ApiError> {
        self.post("/api/leads", lead, "lead").await
    }

    #[instrument(skip(self, to), fields(lead_id = %id, stage_id = %to.stage_id))]
    async fn move_lead(&self, id: &LeadId, to: &LeadMove) -> Result<Lead, ApiError> {
        self.patch(&format!("/api/leads/{id}/move"), to, "lead")
            .await
    }
}

#[async_trait]
impl CampaignsApi for HttpDashboardApi {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.get("/api/campaigns", "campaigns").await
    }

    #[instrument(skip(self, campaign), fields(name = %campaign.name, contacts = campaign.contact_ids.len()))]
    async fn create_campaign(&self, campaign: &NewCampaign) -> Result<Campaign, ApiError> {
        self.post("/api/campaigns", campaign, "campaign").await
    }

    #[instrument(skip(self), fields(campaign_id = %id, action = %control))]
    async fn control_campaign(
        &self,
        id: &CampaignId,
        control: CampaignControl,
    ) -> Result<Campaign, ApiError> {
        let body = ControlBody { action: control };
        self.post(&format!("/api/campaigns/{id}/control"), &body, "campaign")
            .await
    }
}

#[async_trait]
impl ContactsApi for HttpDashboardApi {
    #[instrument(skip(self, sheet), fields(agent_id = %agent_id, file = %sheet.file_name, bytes = sheet.bytes.len()))]
    async fn upload_contacts(
        &self,
        agent_id: &AgentId,
        sheet: &ContactSheet,
    ) -> Result<Vec<ContactId>, ApiError> {
        let path = "/api/calls";
        let part = reqwest::multipart::Part::bytes(sheet.bytes.clone())
            .file_name(sheet.file_name.clone())
            .mime_str(sheet.mime_type())
            .map_err(|e| ApiError::InvalidRequest {
                details: e.to_string(),
            })?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("agentId", agent_id.to_string());
        let request = self.client.put(self.url(path)).multipart(form);

        let response = self.execute("PUT", path, request).await?;
        let body: UploadedContacts = response.json().await.map_err(|e| ApiError::Decode {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        debug!(contacts = body.uploaded_contacts.len(), "contacts uploaded");
        Ok(body.uploaded_contacts)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.get("/api/contacts", "contacts").await
    }
}

#[async_trait]
impl KnowledgeApi for HttpDashboardApi {
    async fn get_document(&self, id: &DocumentId) -> Result<KnowledgeDocument, ApiError> {
        self.get(&format!("/api/knowledge/{id}"), "document").await
    }

    #[instrument(skip(self, update), fields(document_id = %id))]
    async fn update_document(
        &self,
        id: &DocumentId,
        update: &DocumentUpdate,
    ) -> Result<KnowledgeDocument, ApiError> {
        self.patch(&format!("/api/knowledge/{id}"), update, "document")
            .await
    }

    #[instrument(skip(self), fields(document_id = %id))]
    async fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError> {
        self.delete(&format!("/api/knowledge/{id}")).await
    }

    async fn download_document(&self, id: &DocumentId) -> Result<DocumentDownload, ApiError> {
        let path = format!("/api/knowledge/{id}/download");
        let request = self.client.get(self.url(&path));
        let response = self.execute("GET", &path, request).await?;

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|v: &reqwest::header::HeaderValue| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let file_name = header(CONTENT_DISPOSITION)
            .as_deref()
            .and_then(disposition_file_name);

        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            method: "GET",
            path: path.clone(),
            details: e.to_string(),
        })?;

        Ok(DocumentDownload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[async_trait]
impl KitchenApi for HttpDashboardApi {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/api/orders", "orders").await
    }

    #[instrument(skip(self), fields(order_id = %id, status = %update.status))]
    async fn update_order(&self, id: &OrderId, update: &OrderUpdate) -> Result<Order, ApiError> {
        self.patch(&format!("/api/orders/{id}"), update, "order")
            .await
    }

    async fn list_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.get("/api/menu", "items").await
    }

    #[instrument(skip(self, update), fields(menu_item_id = %id))]
    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, ApiError> {
        self.patch(&format!("/api/menu/{id}"), update, "item").await
    }
}

#[async_trait]
impl InsightsApi for HttpDashboardApi {
    async fn analytics(&self) -> Result<AnalyticsSummary, ApiError> {
        self.get("/api/analytics", "analytics").await
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ApiError> {
        self.get("/api/conversations", "conversations").await
    }
}
