//! Imports a contact spreadsheet into a pipeline stage and creates a
//! calling campaign for the new leads.

mod config;

use crate::config::ImporterConfig;
use agentdesk_api::{ApiConfig, ContactSheet, HttpDashboardApi, PipelinesApi};
use agentdesk_dashboard::{
    ImportError, ImportOrchestrator, ImportProgress, ImportRequest, ImportSettings,
};
use rootcause::prelude::Report;
use std::fmt;
use std::path::Path;
use std::process::ExitCode;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug)]
enum ImporterError {
    Config { details: String },
    ReadFile { path: String, details: String },
    Client { details: String },
    Import { details: String },
}

impl fmt::Display for ImporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {details}"),
            Self::ReadFile { path, details } => write!(f, "cannot read {path}: {details}"),
            Self::Client { details } => write!(f, "dashboard API error: {details}"),
            Self::Import { details } => write!(f, "{details}"),
        }
    }
}

impl std::error::Error for ImporterError {}

fn config_error(e: ::config::ConfigError) -> ImporterError {
    ImporterError::Config {
        details: e.to_string(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "import failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Report<ImporterError>> {
    let importer = ImporterConfig::from_env().map_err(config_error)?;
    let api_config = ApiConfig::from_env().map_err(config_error)?;
    let settings = ImportSettings::from_env().map_err(config_error)?;
    info!(base_url = %api_config.base_url, "Loaded configuration");

    let sheet = read_sheet(&importer.file).await?;
    let request = ImportRequest {
        sheet,
        pipeline_id: importer.pipeline_id,
        stage_id: importer.stage_id,
        agent_id: importer.agent_id,
        campaign_name: importer.campaign_name,
        auto_launch: importer.auto_launch,
    };

    let api = HttpDashboardApi::new(&api_config).map_err(|e| ImporterError::Client {
        details: e.to_string(),
    })?;
    check_target(&api, &request).await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling import");
            on_signal.cancel();
        }
    });

    let (progress_tx, progress_rx) = watch::channel(ImportProgress::default());
    let reporter = tokio::spawn(report_progress(progress_rx));

    let result = {
        let mut orchestrator = ImportOrchestrator::new(api, progress_tx, settings);
        orchestrator.run(&request, &cancel).await
    };
    // The sender is gone once the orchestrator is dropped.
    let _ = reporter.await;

    let outcome = result.map_err(|e| ImporterError::Import {
        details: e.to_string(),
    })?;
    info!(
        campaign_id = %outcome.campaign.id,
        created_leads = outcome.created_leads.len(),
        failed_contacts = outcome.failed_contacts.len(),
        launched = outcome.launched,
        "import finished"
    );
    Ok(())
}

async fn read_sheet(path: &Path) -> Result<ContactSheet, Report<ImporterError>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImporterError::ReadFile {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ContactSheet::new(file_name, bytes))
}

/// Validates the form and that the stage belongs to the pipeline before
/// anything is uploaded.
async fn check_target<A: PipelinesApi>(
    api: &A,
    request: &ImportRequest,
) -> Result<(), Report<ImporterError>> {
    let import_error = |e: Report<ImportError>| ImporterError::Import {
        details: e.to_string(),
    };
    request.validate().map_err(import_error)?;

    let pipelines = api.list_pipelines().await.map_err(|e| ImporterError::Client {
        details: e.to_string(),
    })?;
    let pipeline = pipelines
        .iter()
        .find(|p| p.id == request.pipeline_id)
        .ok_or_else(|| ImporterError::Import {
            details: format!("pipeline {} does not exist", request.pipeline_id),
        })?;
    request.validate_target(pipeline).map_err(import_error)?;
    Ok(())
}

async fn report_progress(mut progress: watch::Receiver<ImportProgress>) {
    while progress.changed().await.is_ok() {
        let current = progress.borrow_and_update().clone();
        match &current.message {
            Some(message) => info!(
                stage = %current.stage,
                progress = current.progress,
                message = %message,
                "import progress"
            ),
            None if current.countdown > 0 => info!(
                stage = %current.stage,
                countdown = current.countdown,
                "launching campaign"
            ),
            None => info!(
                stage = %current.stage,
                progress = current.progress,
                processed_leads = current.processed_leads,
                "import progress"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_sheet_with_file_name() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name,phone\nAda,+15550100\n").unwrap();

        let sheet = read_sheet(file.path()).await.unwrap();
        assert!(sheet.file_name.ends_with(".csv"));
        assert!(sheet.has_accepted_extension());
        assert_eq!(sheet.bytes, b"name,phone\nAda,+15550100\n");
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = read_sheet(&path).await.unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}
