//! Error types for the CRM crate.
//!
//! Operations return `Report<CrmError>`; callers wrap these with their own
//! context as the error moves up to the page controllers.

use crate::campaign::{CampaignControl, CampaignStatus};
use agentdesk_core::{LeadId, PipelineId, StageId};
use std::fmt;

/// Errors from CRM domain operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrmError {
    /// A drag referenced a stage position outside the pipeline.
    StageIndexOutOfRange { index: usize, len: usize },
    /// Stage not present in the pipeline.
    StageNotFound { stage_id: StageId },
    /// Pipeline not loaded.
    PipelineNotFound { pipeline_id: PipelineId },
    /// Lead not loaded.
    LeadNotFound { lead_id: LeadId },
    /// Campaign control not valid for the campaign's current status.
    InvalidControl {
        status: CampaignStatus,
        control: CampaignControl,
    },
    /// Client-side validation failed.
    Validation { field: String, reason: String },
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageIndexOutOfRange { index, len } => {
                write!(f, "stage index {index} out of range for {len} stages")
            }
            Self::StageNotFound { stage_id } => write!(f, "stage not found: {stage_id}"),
            Self::PipelineNotFound { pipeline_id } => {
                write!(f, "pipeline not found: {pipeline_id}")
            }
            Self::LeadNotFound { lead_id } => write!(f, "lead not found: {lead_id}"),
            Self::InvalidControl { status, control } => {
                write!(f, "cannot {control} a campaign that is {status}")
            }
            Self::Validation { field, reason } => {
                write!(f, "invalid {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for CrmError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = CrmError::StageIndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "stage index 7 out of range for 3 stages");
    }

    #[test]
    fn invalid_control_display() {
        let err = CrmError::InvalidControl {
            status: CampaignStatus::Draft,
            control: CampaignControl::Pause,
        };
        assert_eq!(err.to_string(), "cannot pause a campaign that is draft");
    }
}
