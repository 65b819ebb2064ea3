//! Client-side logic of the agentdesk dashboard pages.
//!
//! Each controller owns an API handle and the local state its page shows:
//!
//! - [`PipelineBoard`]: pipelines, stages and the lead kanban
//! - [`ImportOrchestrator`]: spreadsheet import through campaign launch
//! - [`AgentsView`] and [`VoicePreview`]: agents and voice samples
//! - [`CampaignBoard`]: campaign list and controls
//! - [`KnowledgeBase`]: knowledge documents
//! - [`KitchenBoard`]: orders and menu
//! - [`load_overview`]: read-only summaries

pub mod agents;
pub mod board;
pub mod campaigns;
pub mod error;
pub mod import;
pub mod insights;
pub mod kitchen;
pub mod knowledge;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

pub use agents::AgentsView;
pub use board::PipelineBoard;
pub use campaigns::CampaignBoard;
pub use error::{DashboardError, ImportError};
pub use import::{
    CampaignContacts, ImportOrchestrator, ImportOutcome, ImportProgress, ImportRequest,
    ImportSettings, ImportStage, ProgressObserver,
};
pub use insights::{Overview, load_overview};
pub use kitchen::KitchenBoard;
pub use knowledge::KnowledgeBase;
pub use voice::{AudioPlayer, PreviewState, VoicePreview};
