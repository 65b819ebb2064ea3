//! Error types for the dashboard controllers and the import workflow.
//!
//! Backend failures arrive as `Report<ApiError>`. Controllers record which
//! action failed and keep the report's text; the local state has already
//! been restored by the time the error is returned.

use crate::import::ImportStage;
use agentdesk_api::ApiError;
use rootcause::prelude::Report;
use std::fmt;

/// Errors from page controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A backend request failed.
    Request {
        action: &'static str,
        details: String,
    },
    /// The operation was refused before any request was made.
    Rejected { details: String },
    /// The referenced entity is not loaded in this view.
    NotLoaded { kind: &'static str, id: String },
    /// A pipeline-scoped operation ran with no pipeline selected.
    NoPipelineSelected,
}

impl DashboardError {
    /// Maps a failed backend call to `Request`, for use with `map_err`.
    pub(crate) fn request(action: &'static str) -> impl FnOnce(Report<ApiError>) -> Self {
        move |e| Self::Request {
            action,
            details: e.to_string(),
        }
    }

    pub(crate) fn not_loaded(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::NotLoaded {
            kind,
            id: id.to_string(),
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { action, details } => write!(f, "failed to {action}: {details}"),
            Self::Rejected { details } => write!(f, "{details}"),
            Self::NotLoaded { kind, id } => write!(f, "{kind} not loaded: {id}"),
            Self::NoPipelineSelected => write!(f, "no pipeline selected"),
        }
    }
}

impl std::error::Error for DashboardError {}

/// Errors from the lead import workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The import form failed validation.
    InvalidRequest { field: &'static str, reason: String },
    /// The spreadsheet upload failed; nothing was created.
    UploadFailed { details: String },
    /// Every lead creation failed, so no contact qualifies for the campaign.
    NoLeadsCreated { attempted: usize },
    /// Campaign creation failed; created leads are kept.
    CampaignFailed { details: String },
    /// The launch request failed; the campaign exists but was not started.
    LaunchFailed { details: String },
    /// The session was closed while the workflow was running.
    Cancelled { stage: ImportStage },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::UploadFailed { details } => write!(f, "upload failed: {details}"),
            Self::NoLeadsCreated { attempted } => {
                write!(f, "none of the {attempted} leads could be created")
            }
            Self::CampaignFailed { details } => {
                write!(f, "campaign creation failed: {details}")
            }
            Self::LaunchFailed { details } => write!(f, "campaign launch failed: {details}"),
            Self::Cancelled { stage } => write!(f, "import cancelled during {stage}"),
        }
    }
}

impl std::error::Error for ImportError {}
