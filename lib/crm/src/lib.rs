//! CRM domain for agentdesk.
//!
//! This crate provides:
//!
//! - **Leads**: prospects tracked through pipeline stages
//! - **Pipelines**: ordered stages and the stage reorder operation
//! - **Kanban**: grouping of leads into stage columns
//! - **Campaigns**: outbound call batches and their control rules
//! - **Filter**: the multi-facet lead filter
//! - **Optimistic**: apply-then-confirm local mutations with rollback

pub mod campaign;
pub mod error;
pub mod filter;
pub mod kanban;
pub mod lead;
pub mod optimistic;
pub mod pipeline;

pub use campaign::{Campaign, CampaignControl, CampaignStatus};
pub use error::CrmError;
pub use filter::{DateRange, LeadFilter, ValueRange};
pub use kanban::{StageColumn, group_by_stage};
pub use lead::{CallStatus, Lead, Priority};
pub use optimistic::apply_optimistic;
pub use pipeline::{Pipeline, Stage, StageOrder, reorder_stages};
