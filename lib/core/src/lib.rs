//! Core types shared by every agentdesk crate.
//!
//! Identifiers are assigned by the dashboard backend; this crate wraps them
//! in distinct types so a lead id can never be passed where a stage id is
//! expected.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{
    AgentId, CampaignId, ContactId, ConversationId, DocumentId, LeadId, MenuItemId, OrderId,
    ParseIdError, PipelineId, StageId, VoiceId,
};
