//! Importer configuration.
//!
//! Loaded from `AGENTDESK__IMPORTER__*` environment variables. The API
//! client and the import workflow read their own sections
//! ([`ApiConfig`](agentdesk_api::ApiConfig),
//! [`ImportSettings`](agentdesk_dashboard::ImportSettings)).

use agentdesk_core::{AgentId, PipelineId, StageId};
use serde::Deserialize;
use std::path::PathBuf;

/// What to import and where the leads go.
#[derive(Debug, Clone, Deserialize)]
pub struct ImporterConfig {
    /// Spreadsheet of contacts (`.csv`, `.xls` or `.xlsx`).
    pub file: PathBuf,

    pub pipeline_id: PipelineId,
    pub stage_id: StageId,

    /// Agent that places the campaign calls.
    pub agent_id: AgentId,

    pub campaign_name: String,

    /// Start the campaign after the countdown.
    #[serde(default)]
    pub auto_launch: bool,
}

impl ImporterConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::with_prefix("AGENTDESK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source(
        source: impl config::Source + Send + Sync + 'static,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .get::<Self>("importer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        config::Environment::with_prefix("AGENTDESK")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn reads_importer_section() {
        let config = ImporterConfig::from_source(environment(&[
            ("AGENTDESK__IMPORTER__FILE", "/tmp/leads.csv"),
            ("AGENTDESK__IMPORTER__PIPELINE_ID", "sales"),
            ("AGENTDESK__IMPORTER__STAGE_ID", "new"),
            ("AGENTDESK__IMPORTER__AGENT_ID", "a1"),
            ("AGENTDESK__IMPORTER__CAMPAIGN_NAME", "Spring outreach"),
            ("AGENTDESK__IMPORTER__AUTO_LAUNCH", "true"),
        ]))
        .unwrap();

        assert_eq!(config.file, PathBuf::from("/tmp/leads.csv"));
        assert_eq!(config.pipeline_id, PipelineId::new("sales"));
        assert_eq!(config.campaign_name, "Spring outreach");
        assert!(config.auto_launch);
    }

    #[test]
    fn auto_launch_defaults_off() {
        let config = ImporterConfig::from_source(environment(&[
            ("AGENTDESK__IMPORTER__FILE", "leads.xlsx"),
            ("AGENTDESK__IMPORTER__PIPELINE_ID", "sales"),
            ("AGENTDESK__IMPORTER__STAGE_ID", "new"),
            ("AGENTDESK__IMPORTER__AGENT_ID", "a1"),
            ("AGENTDESK__IMPORTER__CAMPAIGN_NAME", "Renewals"),
        ]))
        .unwrap();
        assert!(!config.auto_launch);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = ImporterConfig::from_source(environment(&[(
            "AGENTDESK__IMPORTER__CAMPAIGN_NAME",
            "Renewals",
        )]));
        assert!(result.is_err());
    }
}
