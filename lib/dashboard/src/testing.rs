//! In-memory backend shared by the controller tests.

use agentdesk_api::{
    Agent, AgentUpdate, AgentsApi, AnalyticsSummary, ApiError, CampaignsApi, Contact,
    ContactSheet, ContactsApi, ConversationSummary, DocumentDownload, DocumentUpdate,
    InsightsApi, KitchenApi, KnowledgeApi, KnowledgeDocument, LeadMove, LeadQuery, LeadsApi,
    MenuItem, MenuItemUpdate, NewCampaign, NewLead, NewPipeline, Order, OrderUpdate,
    PipelineUpdate, PipelinesApi, StageDraft, Voice,
};
use agentdesk_core::{
    AgentId, CampaignId, ContactId, DocumentId, LeadId, MenuItemId, OrderId, PipelineId, Result,
    StageId,
};
use agentdesk_crm::{Campaign, CampaignControl, CampaignStatus, Lead, Pipeline, Stage, StageOrder};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Backend fake. Operations listed in `failing` answer with a 500.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub pipelines: Mutex<Vec<Pipeline>>,
    pub leads: Mutex<Vec<Lead>>,
    pub agents: Mutex<Vec<Agent>>,
    pub voices: Mutex<Vec<Voice>>,
    pub campaigns: Mutex<Vec<Campaign>>,
    pub orders: Mutex<Vec<Order>>,
    pub menu: Mutex<Vec<MenuItem>>,
    pub documents: Mutex<Vec<KnowledgeDocument>>,
    pub contacts: Mutex<Vec<ContactId>>,
    pub failing: Mutex<HashSet<&'static str>>,
    pub failing_contacts: Mutex<HashSet<ContactId>>,
    pub calls: Mutex<Vec<String>>,
    pub created_campaigns: Mutex<Vec<NewCampaign>>,
    pub launched_at: Mutex<Option<Instant>>,
    /// Delay applied to every lead creation.
    pub lead_latency: Mutex<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        operation: &'static str,
        detail: impl std::fmt::Display,
    ) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation} {detail}"));
        if self.failing.lock().unwrap().contains(operation) {
            return Err(ApiError::Status {
                method: "TEST",
                path: operation.to_string(),
                status: 500,
                message: Some(format!("{operation} rejected")),
            }
            .into());
        }
        Ok(())
    }
}

pub(crate) fn stage(id: &str, order: u32) -> Stage {
    Stage::new(StageId::new(id), id, "#64748b", order)
}

pub(crate) fn pipeline(id: &str, stages: &[&str]) -> Pipeline {
    Pipeline {
        id: PipelineId::new(id),
        name: id.to_string(),
        description: None,
        is_default: false,
        stages: stages
            .iter()
            .enumerate()
            .map(|(i, s)| stage(s, i as u32))
            .collect(),
    }
}

pub(crate) fn lead(id: &str, pipeline_id: &str, stage_id: &str) -> Lead {
    Lead::new(
        LeadId::new(id),
        id,
        PipelineId::new(pipeline_id),
        StageId::new(stage_id),
        Utc::now(),
    )
}

pub(crate) fn campaign(id: &str, status: CampaignStatus) -> Campaign {
    Campaign {
        id: CampaignId::new(id),
        name: id.to_string(),
        agent_id: None,
        status,
        total_calls: 0,
        completed_calls: 0,
        successful_calls: 0,
        failed_calls: 0,
        scheduled_at: None,
        created_at: None,
    }
}

pub(crate) fn agent(id: &str, is_active: bool) -> Agent {
    Agent {
        id: AgentId::new(id),
        name: id.to_string(),
        description: None,
        voice_id: None,
        model: None,
        prompt: None,
        first_message: None,
        tools: Vec::new(),
        is_active,
        created_at: None,
    }
}

fn missing(path: impl std::fmt::Display) -> rootcause::prelude::Report<ApiError> {
    ApiError::Status {
        method: "TEST",
        path: path.to_string(),
        status: 404,
        message: Some("Not found".to_string()),
    }
    .into()
}

#[async_trait]
impl PipelinesApi for FakeBackend {
    async fn list_pipelines(&self) -> Result<Vec<Pipeline>, ApiError> {
        self.record("list_pipelines", "")?;
        Ok(self.pipelines.lock().unwrap().clone())
    }

    async fn create_pipeline(&self, pipeline: &NewPipeline) -> Result<Pipeline, ApiError> {
        self.record("create_pipeline", &pipeline.name)?;
        let mut pipelines = self.pipelines.lock().unwrap();
        let id = format!("p{}", pipelines.len() + 1);
        let created = Pipeline {
            id: PipelineId::new(id),
            name: pipeline.name.clone(),
            description: pipeline.description.clone(),
            is_default: false,
            stages: pipeline
                .stages
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    Stage::new(StageId::new(format!("s{i}")), &s.name, &s.color, i as u32)
                })
                .collect(),
        };
        pipelines.push(created.clone());
        Ok(created)
    }

    async fn update_pipeline(
        &self,
        id: &PipelineId,
        update: &PipelineUpdate,
    ) -> Result<Pipeline, ApiError> {
        self.record("update_pipeline", id)?;
        let mut pipelines = self.pipelines.lock().unwrap();
        let pipeline = pipelines
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| missing(id))?;
        if let Some(name) = &update.name {
            pipeline.name = name.clone();
        }
        if let Some(description) = &update.description {
            pipeline.description = Some(description.clone());
        }
        Ok(pipeline.clone())
    }

    async fn reorder_stages(
        &self,
        id: &PipelineId,
        order: &[StageOrder],
    ) -> Result<Vec<Stage>, ApiError> {
        let ids: Vec<&str> = order.iter().map(|o| o.stage_id.as_str()).collect();
        self.record("reorder_stages", format!("{id} {}", ids.join(",")))?;
        let mut pipelines = self.pipelines.lock().unwrap();
        let pipeline = pipelines
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| missing(id))?;
        for entry in order {
            if let Some(stage) = pipeline.stages.iter_mut().find(|s| s.id == entry.stage_id) {
                stage.order = entry.order;
            }
        }
        pipeline.sort_stages();
        Ok(pipeline.stages.clone())
    }

    async fn set_default_pipeline(&self, id: &PipelineId) -> Result<Pipeline, ApiError> {
        self.record("set_default_pipeline", id)?;
        let mut pipelines = self.pipelines.lock().unwrap();
        for pipeline in pipelines.iter_mut() {
            pipeline.is_default = &pipeline.id == id;
        }
        pipelines
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| missing(id))
    }

    async fn add_stage(&self, id: &PipelineId, stage: &StageDraft) -> Result<Vec<Stage>, ApiError> {
        self.record("add_stage", format!("{id} {}", stage.name))?;
        let mut pipelines = self.pipelines.lock().unwrap();
        let pipeline = pipelines
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| missing(id))?;
        let order = pipeline.stages.len() as u32;
        pipeline.stages.push(Stage::new(
            StageId::new(format!("{}-{order}", stage.name.to_lowercase())),
            &stage.name,
            &stage.color,
            stage.order.unwrap_or(order),
        ));
        Ok(pipeline.stages.clone())
    }

    async fn update_stage(
        &self,
        id: &PipelineId,
        stage_id: &StageId,
        stage: &StageDraft,
    ) -> Result<Vec<Stage>, ApiError> {
        self.record("update_stage", format!("{id} {stage_id}"))?;
        let mut pipelines = self.pipelines.lock().unwrap();
        let pipeline = pipelines
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| missing(id))?;
        let existing = pipeline
            .stages
            .iter_mut()
            .find(|s| &s.id == stage_id)
            .ok_or_else(|| missing(stage_id))?;
        existing.name = stage.name.clone();
        existing.color = stage.color.clone();
        Ok(pipeline.stages.clone())
    }

    async fn delete_stage(
        &self,
        id: &PipelineId,
        stage_id: &StageId,
    ) -> Result<Vec<Stage>, ApiError> {
        self.record("delete_stage", format!("{id} {stage_id}"))?;
        let mut pipelines = self.pipelines.lock().unwrap();
        let pipeline = pipelines
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| missing(id))?;
        // Leaves a gap in `order`, the way the backend does.
        pipeline.stages.retain(|s| &s.id != stage_id);
        Ok(pipeline.stages.clone())
    }
}

#[async_trait]
impl LeadsApi for FakeBackend {
    async fn list_leads(&self, query: &LeadQuery) -> Result<Vec<Lead>, ApiError> {
        self.record("list_leads", format!("{:?}", query.to_pairs()))?;
        Ok(self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|l| query.pipeline_id.as_ref().is_none_or(|p| &l.pipeline_id == p))
            .cloned()
            .collect())
    }

    async fn create_lead(&self, lead: &NewLead) -> Result<Lead, ApiError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let latency = *self.lead_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let contact = lead.contact_id.clone();
        self.record(
            "create_lead",
            contact.as_ref().map_or("-", |c| c.as_str()),
        )?;
        if let Some(contact) = &contact {
            if self.failing_contacts.lock().unwrap().contains(contact) {
                return Err(ApiError::Status {
                    method: "POST",
                    path: "/api/leads".to_string(),
                    status: 422,
                    message: Some(format!("contact {contact} has no phone number")),
                }
                .into());
            }
        }

        let mut leads = self.leads.lock().unwrap();
        let id = format!("l{}", leads.len() + 1);
        let mut created = Lead::new(
            LeadId::new(id),
            lead.name.clone().unwrap_or_default(),
            lead.pipeline_id.clone(),
            lead.stage_id.clone(),
            Utc::now(),
        );
        created.source = lead.source.clone();
        created.priority = lead.priority;
        leads.push(created.clone());
        Ok(created)
    }

    async fn move_lead(&self, id: &LeadId, to: &LeadMove) -> Result<Lead, ApiError> {
        self.record("move_lead", format!("{id} {}", to.stage_id))?;
        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| missing(id))?;
        lead.stage_id = to.stage_id.clone();
        Ok(lead.clone())
    }
}

#[async_trait]
impl CampaignsApi for FakeBackend {
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.record("list_campaigns", "")?;
        Ok(self.campaigns.lock().unwrap().clone())
    }

    async fn create_campaign(&self, request: &NewCampaign) -> Result<Campaign, ApiError> {
        self.record("create_campaign", &request.name)?;
        self.created_campaigns.lock().unwrap().push(request.clone());
        let mut campaigns = self.campaigns.lock().unwrap();
        let mut created = campaign(&format!("c{}", campaigns.len() + 1), CampaignStatus::Draft);
        created.name = request.name.clone();
        created.agent_id = Some(request.agent_id.clone());
        created.total_calls = request.contact_ids.len() as u32;
        campaigns.push(created.clone());
        Ok(created)
    }

    async fn control_campaign(
        &self,
        id: &CampaignId,
        control: CampaignControl,
    ) -> Result<Campaign, ApiError> {
        *self.launched_at.lock().unwrap() = Some(Instant::now());
        self.record("control_campaign", format!("{id} {control}"))?;
        let mut campaigns = self.campaigns.lock().unwrap();
        let campaign = campaigns
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| missing(id))?;
        campaign.status = control.resulting_status();
        Ok(campaign.clone())
    }
}

#[async_trait]
impl ContactsApi for FakeBackend {
    async fn upload_contacts(
        &self,
        agent_id: &AgentId,
        sheet: &ContactSheet,
    ) -> Result<Vec<ContactId>, ApiError> {
        self.record("upload_contacts", format!("{agent_id} {}", sheet.file_name))?;
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.record("list_contacts", "")?;
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .map(|id| Contact {
                id: id.clone(),
                name: None,
                phone: None,
                email: None,
                company: None,
                created_at: None,
            })
            .collect())
    }
}

#[async_trait]
impl AgentsApi for FakeBackend {
    async fn list_agents(&self) -> Result<Vec<Agent>, ApiError> {
        self.record("list_agents", "")?;
        Ok(self.agents.lock().unwrap().clone())
    }

    async fn update_agent(&self, id: &AgentId, update: &AgentUpdate) -> Result<Agent, ApiError> {
        self.record("update_agent", id)?;
        let mut agents = self.agents.lock().unwrap();
        let agent = agents
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| missing(id))?;
        update.apply_to(agent);
        Ok(agent.clone())
    }

    async fn delete_agent(&self, id: &AgentId) -> Result<(), ApiError> {
        self.record("delete_agent", id)?;
        self.agents.lock().unwrap().retain(|a| &a.id != id);
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, ApiError> {
        self.record("list_voices", "")?;
        Ok(self.voices.lock().unwrap().clone())
    }
}

#[async_trait]
impl KnowledgeApi for FakeBackend {
    async fn get_document(&self, id: &DocumentId) -> Result<KnowledgeDocument, ApiError> {
        self.record("get_document", id)?;
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| &d.id == id)
            .cloned()
            .ok_or_else(|| missing(id))
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        update: &DocumentUpdate,
    ) -> Result<KnowledgeDocument, ApiError> {
        self.record("update_document", id)?;
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| missing(id))?;
        if let Some(title) = &update.title {
            document.title = title.clone();
        }
        if let Some(description) = &update.description {
            document.description = Some(description.clone());
        }
        if let Some(tags) = &update.tags {
            document.tags = tags.clone();
        }
        Ok(document.clone())
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError> {
        self.record("delete_document", id)?;
        self.documents.lock().unwrap().retain(|d| &d.id != id);
        Ok(())
    }

    async fn download_document(&self, id: &DocumentId) -> Result<DocumentDownload, ApiError> {
        self.record("download_document", id)?;
        let documents = self.documents.lock().unwrap();
        let document = documents
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| missing(id))?;
        Ok(DocumentDownload {
            file_name: document.file_name.clone(),
            content_type: document.content_type.clone(),
            bytes: document.title.as_bytes().to_vec(),
        })
    }
}

#[async_trait]
impl KitchenApi for FakeBackend {
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.record("list_orders", "")?;
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn update_order(&self, id: &OrderId, update: &OrderUpdate) -> Result<Order, ApiError> {
        self.record("update_order", format!("{id} {}", update.status))?;
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| missing(id))?;
        order.status = update.status;
        Ok(order.clone())
    }

    async fn list_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        self.record("list_menu", "")?;
        Ok(self.menu.lock().unwrap().clone())
    }

    async fn update_menu_item(
        &self,
        id: &MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, ApiError> {
        self.record("update_menu_item", id)?;
        let mut menu = self.menu.lock().unwrap();
        let item = menu
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| missing(id))?;
        if let Some(available) = update.available {
            item.available = available;
        }
        if let Some(price) = update.price {
            item.price = price;
        }
        Ok(item.clone())
    }
}

#[async_trait]
impl InsightsApi for FakeBackend {
    async fn analytics(&self) -> Result<AnalyticsSummary, ApiError> {
        self.record("analytics", "")?;
        Ok(AnalyticsSummary {
            total_calls: 10,
            successful_calls: 7,
            failed_calls: 3,
            ..AnalyticsSummary::default()
        })
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ApiError> {
        self.record("list_conversations", "")?;
        Ok(Vec::new())
    }
}
