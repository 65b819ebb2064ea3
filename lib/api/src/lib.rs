//! REST client for the agentdesk dashboard backend.
//!
//! Each area of the backend is a trait so page controllers and the import
//! workflow can run against in-memory fakes:
//!
//! - [`AgentsApi`]: voice agents and TTS voices
//! - [`PipelinesApi`]: pipelines and their stages
//! - [`LeadsApi`]: leads and stage moves
//! - [`CampaignsApi`]: campaigns and campaign control
//! - [`ContactsApi`]: spreadsheet upload and the contacts list
//! - [`KnowledgeApi`]: knowledge base documents
//! - [`KitchenApi`]: orders and menu
//! - [`InsightsApi`]: analytics and conversations
//!
//! [`DashboardApi`] bundles every area; [`HttpDashboardApi`] implements all
//! of them over reqwest.

pub mod agents;
pub mod campaigns;
pub mod config;
pub mod contacts;
mod envelope;
pub mod error;
pub mod http;
pub mod insights;
pub mod kitchen;
pub mod knowledge;
pub mod leads;
pub mod pipelines;

pub use agents::{Agent, AgentUpdate, AgentsApi, Voice};
pub use campaigns::{CampaignsApi, NewCampaign};
pub use config::ApiConfig;
pub use contacts::{ACCEPTED_EXTENSIONS, Contact, ContactSheet, ContactsApi};
pub use error::ApiError;
pub use http::HttpDashboardApi;
pub use insights::{AnalyticsSummary, ConversationSummary, InsightsApi};
pub use kitchen::{
    KitchenApi, MenuItem, MenuItemUpdate, Order, OrderItem, OrderStatus, OrderUpdate,
};
pub use knowledge::{DocumentDownload, DocumentUpdate, KnowledgeApi, KnowledgeDocument};
pub use leads::{IMPORT_SOURCE, LeadMove, LeadQuery, LeadsApi, NewLead};
pub use pipelines::{NewPipeline, PipelineUpdate, PipelinesApi, StageDraft};

/// Every backend area in one bound.
///
/// Implemented for anything that implements all the area traits.
pub trait DashboardApi:
    AgentsApi
    + PipelinesApi
    + LeadsApi
    + CampaignsApi
    + ContactsApi
    + KnowledgeApi
    + KitchenApi
    + InsightsApi
{
}

impl<T> DashboardApi for T where
    T: AgentsApi
        + PipelinesApi
        + LeadsApi
        + CampaignsApi
        + ContactsApi
        + KnowledgeApi
        + KitchenApi
        + InsightsApi
{
}
