//! Voice agents and the TTS voices they speak with.

use crate::error::ApiError;
use agentdesk_core::{AgentId, Result, VoiceId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configurable AI voice persona used to conduct calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(alias = "_id")]
    pub id: AgentId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub voice_id: Option<VoiceId>,
    /// Language model the agent runs on.
    #[serde(default)]
    pub model: Option<String>,
    /// System prompt.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Opening line spoken when a call connects.
    #[serde(default)]
    pub first_message: Option<String>,
    /// Names of the tools the agent may call.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A text-to-speech voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    #[serde(alias = "voiceId", alias = "_id")]
    pub id: VoiceId,
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    /// Sample audio played by the voice preview button.
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// Partial update sent to `PATCH /api/agents/:id`. Unset fields are left
/// unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<VoiceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl AgentUpdate {
    /// Update that only flips the active flag.
    #[must_use]
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    /// Applies the set fields to a local copy of the agent.
    pub fn apply_to(&self, agent: &mut Agent) {
        if let Some(name) = &self.name {
            agent.name = name.clone();
        }
        if let Some(description) = &self.description {
            agent.description = Some(description.clone());
        }
        if let Some(voice_id) = &self.voice_id {
            agent.voice_id = Some(voice_id.clone());
        }
        if let Some(model) = &self.model {
            agent.model = Some(model.clone());
        }
        if let Some(prompt) = &self.prompt {
            agent.prompt = Some(prompt.clone());
        }
        if let Some(first_message) = &self.first_message {
            agent.first_message = Some(first_message.clone());
        }
        if let Some(tools) = &self.tools {
            agent.tools = tools.clone();
        }
        if let Some(is_active) = self.is_active {
            agent.is_active = is_active;
        }
    }
}

/// Agents and voices endpoints.
#[async_trait]
pub trait AgentsApi: Send + Sync {
    /// `GET /api/agents`
    async fn list_agents(&self) -> Result<Vec<Agent>, ApiError>;

    /// `PATCH /api/agents/:id`
    async fn update_agent(&self, id: &AgentId, update: &AgentUpdate) -> Result<Agent, ApiError>;

    /// `DELETE /api/agents/:id`
    async fn delete_agent(&self, id: &AgentId) -> Result<(), ApiError>;

    /// `GET /api/voices`
    async fn list_voices(&self) -> Result<Vec<Voice>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_update_serializes_only_flag() {
        let json = serde_json::to_value(AgentUpdate::active(false)).unwrap();
        assert_eq!(json, serde_json::json!({"isActive": false}));
    }

    #[test]
    fn apply_to_changes_only_set_fields() {
        let mut agent: Agent = serde_json::from_value(serde_json::json!({
            "_id": "a1",
            "name": "Receptionist",
            "model": "gpt-4o",
            "isActive": true
        }))
        .unwrap();

        let update = AgentUpdate {
            prompt: Some("Greet callers warmly.".to_string()),
            is_active: Some(false),
            ..AgentUpdate::default()
        };
        update.apply_to(&mut agent);

        assert_eq!(agent.name, "Receptionist");
        assert_eq!(agent.model.as_deref(), Some("gpt-4o"));
        assert_eq!(agent.prompt.as_deref(), Some("Greet callers warmly."));
        assert!(!agent.is_active);
    }

    #[test]
    fn voice_accepts_voice_id_key() {
        let voice: Voice = serde_json::from_value(serde_json::json!({
            "voiceId": "v9",
            "name": "Rachel",
            "previewUrl": "https://cdn.example.com/rachel.mp3"
        }))
        .unwrap();
        assert_eq!(voice.id.as_str(), "v9");
        assert!(voice.preview_url.is_some());
    }
}
