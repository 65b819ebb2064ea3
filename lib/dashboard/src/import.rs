//! Lead import and campaign launch.
//!
//! One import runs these steps in order:
//!
//! 1. Upload the contacts spreadsheet for the chosen agent.
//! 2. Create one lead per uploaded contact in the target pipeline stage,
//!    with at most `concurrency` requests in flight. A failed lead is
//!    logged and skipped.
//! 3. Create a campaign for the agent over the selected contacts.
//! 4. With auto-launch, count down and start the campaign.
//! 5. Show completion for a moment, then reset to idle.
//!
//! Every progress change is published to a [`ProgressObserver`]. A failure
//! at any step returns the view to idle with the error in `message`;
//! whatever the backend already created is kept.

use crate::error::ImportError;
use agentdesk_api::{CampaignsApi, ContactSheet, ContactsApi, LeadsApi, NewCampaign, NewLead};
use agentdesk_core::{AgentId, CampaignId, ContactId, PipelineId, StageId};
use agentdesk_crm::{Campaign, CampaignControl, Lead, Pipeline};
use futures::StreamExt;
use futures::stream;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Progress once the upload has been accepted.
pub const UPLOAD_PROGRESS: u8 = 30;

/// Share of the bar spread across lead creation.
pub const LEADS_PROGRESS_SHARE: u8 = 40;

/// Progress once the campaign exists.
pub const CAMPAIGN_PROGRESS: u8 = 100;

/// Where an import currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStage {
    #[default]
    Idle,
    Uploading,
    Processing,
    Countdown,
    Launching,
    Complete,
}

impl ImportStage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Countdown => "countdown",
            Self::Launching => "launching",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View-model of the import dialog. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    pub stage: ImportStage,
    /// 0 to 100.
    pub progress: u8,
    /// Seconds left before launch while in `Countdown`.
    pub countdown: u32,
    pub message: Option<String>,
    /// Leads created so far.
    pub processed_leads: usize,
    pub campaign_id: Option<CampaignId>,
}

/// Progress after `attempted` of `total` lead creations have finished,
/// successful or not.
#[must_use]
pub fn lead_progress(attempted: usize, total: usize) -> u8 {
    if total == 0 {
        return UPLOAD_PROGRESS;
    }
    let attempted = attempted.min(total);
    let share = usize::from(LEADS_PROGRESS_SHARE) * attempted / total;
    UPLOAD_PROGRESS + share as u8
}

/// Receives every progress change.
pub trait ProgressObserver: Send + Sync {
    fn publish(&self, progress: &ImportProgress);
}

impl ProgressObserver for watch::Sender<ImportProgress> {
    fn publish(&self, progress: &ImportProgress) {
        self.send_replace(progress.clone());
    }
}

/// Which contacts the created campaign calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignContacts {
    /// Only contacts whose lead was created.
    #[default]
    CreatedLeads,
    /// Every uploaded contact, even those whose lead creation failed.
    Uploaded,
}

/// Tuning of the import workflow.
///
/// Loaded from `AGENTDESK__IMPORT__*` environment variables; every field
/// has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportSettings {
    /// Maximum lead-creation requests in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Length of the pre-launch countdown, in ticks.
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,

    /// Countdown tick in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// How long `Complete` stays visible before the reset, in milliseconds.
    #[serde(default = "default_completion_hold_ms")]
    pub completion_hold_ms: u64,

    #[serde(default)]
    pub campaign_contacts: CampaignContacts,
}

fn default_concurrency() -> usize {
    4
}

fn default_countdown_seconds() -> u32 {
    5
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_completion_hold_ms() -> u64 {
    2000
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            countdown_seconds: default_countdown_seconds(),
            tick_ms: default_tick_ms(),
            completion_hold_ms: default_completion_hold_ms(),
            campaign_contacts: CampaignContacts::default(),
        }
    }
}

impl ImportSettings {
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[must_use]
    pub fn completion_hold(&self) -> Duration {
        Duration::from_millis(self.completion_hold_ms)
    }

    /// Loads the `import` section from the environment, falling back to
    /// defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but does not parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("AGENTDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        match settings.get::<Self>("import") {
            Ok(import) => Ok(import),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }
}

/// The submitted import form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub sheet: ContactSheet,
    pub pipeline_id: PipelineId,
    pub stage_id: StageId,
    pub agent_id: AgentId,
    pub campaign_name: String,
    pub auto_launch: bool,
}

impl ImportRequest {
    /// Checks the form before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidRequest` naming the first bad field.
    pub fn validate(&self) -> Result<(), Report<ImportError>> {
        Ok(self.check()?)
    }

    /// Checks that the target stage belongs to the target pipeline.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidRequest` if it does not.
    pub fn validate_target(&self, pipeline: &Pipeline) -> Result<(), Report<ImportError>> {
        if pipeline.id != self.pipeline_id {
            return Err(invalid("pipeline", format!("expected {}", self.pipeline_id)).into());
        }
        if pipeline.stage(&self.stage_id).is_none() {
            return Err(invalid(
                "stage",
                format!("{} is not a stage of {}", self.stage_id, pipeline.name),
            )
            .into());
        }
        Ok(())
    }

    fn check(&self) -> Result<(), ImportError> {
        if self.sheet.bytes.is_empty() {
            return Err(invalid("file", "the file is empty"));
        }
        if !self.sheet.has_accepted_extension() {
            return Err(invalid(
                "file",
                format!("{} is not a CSV or Excel file", self.sheet.file_name),
            ));
        }
        if self.campaign_name.trim().is_empty() {
            return Err(invalid("campaign name", "a campaign name is required"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidRequest {
        field,
        reason: reason.into(),
    }
}

/// What a finished import produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub campaign: Campaign,
    pub created_leads: Vec<Lead>,
    /// Contacts whose lead could not be created.
    pub failed_contacts: Vec<ContactId>,
    pub launched: bool,
}

/// Current progress plus the observer it is published to.
struct ProgressTracker<O> {
    current: ImportProgress,
    observer: O,
}

impl<O: ProgressObserver> ProgressTracker<O> {
    fn update(&mut self, change: impl FnOnce(&mut ImportProgress)) {
        change(&mut self.current);
        self.observer.publish(&self.current);
    }

    fn reset(&mut self, message: Option<String>) {
        self.update(|p| {
            *p = ImportProgress {
                message,
                ..ImportProgress::default()
            }
        });
    }
}

/// Drives one import at a time.
pub struct ImportOrchestrator<A, O> {
    api: A,
    settings: ImportSettings,
    tracker: ProgressTracker<O>,
}

impl<A, O> ImportOrchestrator<A, O>
where
    A: ContactsApi + LeadsApi + CampaignsApi,
    O: ProgressObserver,
{
    pub fn new(api: A, observer: O, settings: ImportSettings) -> Self {
        Self {
            api,
            settings,
            tracker: ProgressTracker {
                current: ImportProgress::default(),
                observer,
            },
        }
    }

    #[must_use]
    pub fn progress(&self) -> &ImportProgress {
        &self.tracker.current
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Runs the whole workflow.
    ///
    /// Returns once the completion display has elapsed and the view is
    /// back to idle. Cancelling `cancel` stops the workflow at its next
    /// await point; a pending launch is never sent.
    ///
    /// # Errors
    ///
    /// Returns the `ImportError` of the step that failed.
    #[instrument(skip_all, fields(file = %request.sheet.file_name, auto_launch = request.auto_launch))]
    pub async fn run(
        &mut self,
        request: &ImportRequest,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome, Report<ImportError>> {
        match self.execute(request, cancel).await {
            Ok(outcome) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    () = tokio::time::sleep(self.settings.completion_hold()) => {}
                }
                self.tracker.reset(None);
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "import failed");
                self.tracker.reset(Some(e.to_string()));
                Err(e.into())
            }
        }
    }

    async fn execute(
        &mut self,
        request: &ImportRequest,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome, ImportError> {
        request.check()?;

        self.tracker.update(|p| {
            *p = ImportProgress {
                stage: ImportStage::Uploading,
                message: Some(format!("Uploading {}", request.sheet.file_name)),
                ..ImportProgress::default()
            }
        });
        let contact_ids = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(ImportError::Cancelled { stage: ImportStage::Uploading });
            }
            result = self.api.upload_contacts(&request.agent_id, &request.sheet) => {
                result.map_err(|e| ImportError::UploadFailed { details: e.to_string() })?
            }
        };
        let total = contact_ids.len();
        info!(contacts = total, "contacts uploaded");

        self.tracker.update(|p| {
            p.stage = ImportStage::Processing;
            p.progress = UPLOAD_PROGRESS;
            p.message = Some(format!("Creating {total} leads"));
        });
        let (created, failed_contacts) = self.create_leads(request, &contact_ids, cancel).await?;

        let campaign_contacts = match self.settings.campaign_contacts {
            CampaignContacts::Uploaded => contact_ids.clone(),
            CampaignContacts::CreatedLeads => {
                if total > 0 && created.is_empty() {
                    return Err(ImportError::NoLeadsCreated { attempted: total });
                }
                let ok: HashSet<&ContactId> = created.iter().map(|(contact, _)| contact).collect();
                contact_ids
                    .iter()
                    .filter(|c| ok.contains(c))
                    .cloned()
                    .collect()
            }
        };
        let created_leads: Vec<Lead> = created.into_iter().map(|(_, lead)| lead).collect();

        let new_campaign = NewCampaign {
            name: request.campaign_name.trim().to_string(),
            agent_id: request.agent_id.clone(),
            contact_ids: campaign_contacts,
            scheduled_at: None,
        };
        let mut campaign = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(ImportError::Cancelled { stage: ImportStage::Processing });
            }
            result = self.api.create_campaign(&new_campaign) => {
                result.map_err(|e| ImportError::CampaignFailed { details: e.to_string() })?
            }
        };
        info!(campaign_id = %campaign.id, contacts = new_campaign.contact_ids.len(), "campaign created");
        self.tracker.update(|p| {
            p.progress = CAMPAIGN_PROGRESS;
            p.campaign_id = Some(campaign.id.clone());
            p.message = Some(format!("Campaign \"{}\" created", campaign.name));
        });

        if request.auto_launch {
            campaign = self.launch(&campaign.id, cancel).await?;
        }

        let message = if request.auto_launch {
            format!("Campaign launched with {} leads", created_leads.len())
        } else {
            format!("Imported {} leads", created_leads.len())
        };
        self.tracker.update(|p| {
            p.stage = ImportStage::Complete;
            p.countdown = 0;
            p.message = Some(message);
        });

        Ok(ImportOutcome {
            campaign,
            created_leads,
            failed_contacts,
            launched: request.auto_launch,
        })
    }

    /// Creates one lead per contact with bounded concurrency.
    ///
    /// Returns the created leads paired with their contact, and the
    /// contacts that failed.
    async fn create_leads(
        &mut self,
        request: &ImportRequest,
        contact_ids: &[ContactId],
        cancel: &CancellationToken,
    ) -> Result<(Vec<(ContactId, Lead)>, Vec<ContactId>), ImportError> {
        let total = contact_ids.len();
        let api = &self.api;
        let pipeline_id = &request.pipeline_id;
        let stage_id = &request.stage_id;

        let mut attempts = stream::iter(contact_ids.iter().cloned())
            .map(move |contact_id| async move {
                let lead =
                    NewLead::from_contact(contact_id.clone(), pipeline_id.clone(), stage_id.clone());
                let result = api.create_lead(&lead).await;
                (contact_id, result)
            })
            .buffer_unordered(self.settings.concurrency.max(1));

        let mut created = Vec::with_capacity(total);
        let mut failed = Vec::new();
        let mut attempted = 0;
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(ImportError::Cancelled { stage: ImportStage::Processing });
                }
                next = attempts.next() => next,
            };
            let Some((contact_id, result)) = next else {
                break;
            };

            attempted += 1;
            match result {
                Ok(lead) => {
                    debug!(contact_id = %contact_id, lead_id = %lead.id, "lead created");
                    created.push((contact_id, lead));
                }
                Err(e) => {
                    warn!(contact_id = %contact_id, error = %e, "lead creation failed, skipping");
                    failed.push(contact_id);
                }
            }

            let processed = created.len();
            self.tracker.update(|p| {
                p.progress = lead_progress(attempted, total);
                p.processed_leads = processed;
                p.message = Some(format!("Created {processed} of {total} leads"));
            });
        }

        if !failed.is_empty() {
            warn!(failed = failed.len(), total, "some leads were not created");
        }
        Ok((created, failed))
    }

    /// Counts down, then starts the campaign.
    async fn launch(
        &mut self,
        campaign_id: &CampaignId,
        cancel: &CancellationToken,
    ) -> Result<Campaign, ImportError> {
        let tick = self.settings.tick();
        for remaining in (1..=self.settings.countdown_seconds).rev() {
            self.tracker.update(|p| {
                p.stage = ImportStage::Countdown;
                p.countdown = remaining;
                p.message = Some(format!("Launching in {remaining}"));
            });
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(ImportError::Cancelled { stage: ImportStage::Countdown });
                }
                () = tokio::time::sleep(tick) => {}
            }
        }

        self.tracker.update(|p| {
            p.stage = ImportStage::Launching;
            p.countdown = 0;
            p.message = Some("Starting campaign".to_string());
        });
        let campaign = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(ImportError::Cancelled { stage: ImportStage::Launching });
            }
            result = self.api.control_campaign(campaign_id, CampaignControl::Start) => {
                result.map_err(|e| ImportError::LaunchFailed { details: e.to_string() })?
            }
        };
        info!(campaign_id = %campaign.id, status = %campaign.status, "campaign launched");
        Ok(campaign)
    }
}
