//! Strongly-typed ID types for dashboard entities.
//!
//! The backend owns every identifier and hands them out as opaque strings
//! (database object ids). The wrappers keep them apart at compile time and
//! reject blank values when parsed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed wrapper around a backend id string.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a backend-issued identifier.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Returns the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the raw identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: "identifier is empty".to_string(),
                    });
                }
                if trimmed.contains('/') {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: format!("identifier '{trimmed}' contains a path separator"),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for an AI voice agent.
    AgentId
);

define_id!(
    /// Unique identifier for a text-to-speech voice.
    VoiceId
);

define_id!(
    /// Unique identifier for a sales pipeline.
    PipelineId
);

define_id!(
    /// Unique identifier for a stage within a pipeline.
    StageId
);

define_id!(
    /// Unique identifier for a lead.
    LeadId
);

define_id!(
    /// Unique identifier for a contact parsed from an uploaded spreadsheet.
    ContactId
);

define_id!(
    /// Unique identifier for an outbound call campaign.
    CampaignId
);

define_id!(
    /// Unique identifier for a knowledge base document.
    DocumentId
);

define_id!(
    /// Unique identifier for a kitchen order.
    OrderId
);

define_id!(
    /// Unique identifier for a menu item.
    MenuItemId
);

define_id!(
    /// Unique identifier for a recorded conversation.
    ConversationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_value() {
        let id = LeadId::new("65f1c0ffee");
        assert_eq!(id.to_string(), "65f1c0ffee");
    }

    #[test]
    fn parse_trims_whitespace() {
        let id: StageId = "  stage-1 ".parse().expect("should parse");
        assert_eq!(id.as_str(), "stage-1");
    }

    #[test]
    fn parse_rejects_empty() {
        let result: Result<PipelineId, _> = "   ".parse();
        let err = result.unwrap_err();
        assert_eq!(err.id_type, "PipelineId");
    }

    #[test]
    fn parse_rejects_path_separator() {
        let result: Result<CampaignId, _> = "abc/../def".parse();
        assert!(result.is_err());
    }

    #[test]
    fn id_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ContactId::new("a"));
        set.insert(ContactId::new("b"));
        set.insert(ContactId::new("a"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AgentId::new("agent_42");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"agent_42\"");
        let parsed: AgentId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, id);
    }
}
