//! The submission state machine.
//!
//! ```text
//! Received → Extracted → [ResolvingProfile] → [ResolvingPlatform] → Publishing
//!                                                                   ├→ Published
//!                                                                   └→ PublishedDegraded
//! any step → Rejected | Cancelled | TimedOut
//! ```
//!
//! Each submission runs as one sequential task. The only suspension points
//! are the interactive waits, which are bounded by the configured timeouts
//! and a [`CancellationToken`], and the storage calls made while the
//! [`PublishLock`] is held.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio_util::sync::CancellationToken;

use asb_submit_core::Guid;
use asb_submit_ini::{IniDocument, IniError, normalize};
use asb_submit_records::dino::DINO_DATA_SECTION;
use asb_submit_records::{DinoRecord, GUID_KEY, SessionProfile, SessionRecord};

use crate::archive::{GAME_INI, is_zip_name, read_archive, retain_archive};
use crate::context::{
    DinoSubmission, OFFICIAL, SubmissionSession, SubmissionState, UNOFFICIAL,
};
use crate::error::SubmitError;
use crate::settings::Settings;
use crate::storage::{
    OutputFile, PublishLock, Storage, SyncResult, path_component, remove_output,
    submission_dir, write_output,
};
use crate::transport::{Attachment, Choice, FileRequest, Prompt, Submitter, Transport};

const CANCELLED_MESSAGE: &str = "Your request has been canceled.";

/// An incoming archive plus the options given with it.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub submitter: Submitter,
    pub archive_name: String,
    pub archive: Vec<u8>,
    /// `"official"` or `"unofficial"`; anything else is rejected.
    pub official: String,
    pub singleplayer: bool,
    pub received_at: DateTime<Local>,
}

impl SubmissionRequest {
    pub fn new(submitter: Submitter, archive_name: impl Into<String>, archive: Vec<u8>) -> Self {
        Self {
            submitter,
            archive_name: archive_name.into(),
            archive,
            official: UNOFFICIAL.to_string(),
            singleplayer: false,
            received_at: Local::now(),
        }
    }

    pub fn official(mut self, official: impl Into<String>) -> Self {
        self.official = official.into();
        self
    }

    pub fn singleplayer(mut self, singleplayer: bool) -> Self {
        self.singleplayer = singleplayer;
        self
    }
}

/// How a submission ended.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub id: Guid,
    pub state: SubmissionState,
    /// Every state visited, in order.
    pub path: Vec<SubmissionState>,
    /// Final message sent to the submitter.
    pub message: String,
    /// Files written, in the primary root or the fallback.
    pub written: Vec<PathBuf>,
    pub session: SessionRecord,
}

struct Finish {
    state: SubmissionState,
    message: String,
    written: Vec<PathBuf>,
}

/// Why a step stopped the run early.
enum Halt {
    Finish(Finish),
    Error(SubmitError),
}

impl From<SubmitError> for Halt {
    fn from(e: SubmitError) -> Self {
        Self::Error(e)
    }
}

type Step<T = ()> = Result<T, Halt>;

fn end(state: SubmissionState, message: impl Into<String>) -> Halt {
    Halt::Finish(Finish {
        state,
        message: message.into(),
        written: Vec::new(),
    })
}

enum Wait<T> {
    Ready(T),
    TimedOut,
    Cancelled,
}

/// Await `fut` for at most `limit`, giving up early on cancellation.
async fn bounded<F: Future>(limit: Duration, cancel: &CancellationToken, fut: F) -> Wait<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Wait::Cancelled,
        result = tokio::time::timeout(limit, fut) => match result {
            Ok(value) => Wait::Ready(value),
            Err(_) => Wait::TimedOut,
        },
    }
}

struct PublishFailure {
    stage: &'static str,
    detail: String,
}

impl PublishFailure {
    fn new(stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
        }
    }
}

/// Runs submissions against one transport and one storage.
///
/// Workflows that publish into the same storage root must share a
/// [`PublishLock`] (see [`Workflow::with_publish_lock`]).
pub struct Workflow<T, S> {
    settings: Settings,
    transport: Arc<T>,
    storage: Arc<S>,
    lock: PublishLock,
}

impl<T: Transport, S: Storage> Workflow<T, S> {
    pub fn new(settings: Settings, transport: Arc<T>, storage: Arc<S>) -> Self {
        Self {
            settings,
            transport,
            storage,
            lock: PublishLock::new(),
        }
    }

    pub fn with_publish_lock(mut self, lock: PublishLock) -> Self {
        self.lock = lock;
        self
    }

    pub fn publish_lock(&self) -> &PublishLock {
        &self.lock
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process one submission to a terminal state.
    ///
    /// Terminal outcomes, including rejection and timeouts, are `Ok`.
    /// `Err` means the transport failed or the fallback could not be written;
    /// the session is then closed as `Cancelled`.
    pub async fn run(
        &self,
        request: SubmissionRequest,
        cancel: CancellationToken,
    ) -> Result<SubmissionOutcome, SubmitError> {
        let mut ctx = SubmissionSession::new(
            request.submitter.clone(),
            request.official.clone(),
            request.singleplayer,
        );
        log::info!(
            "[{} {}] Received {} ({} bytes)",
            ctx.submitter,
            ctx.id,
            request.archive_name,
            request.archive.len()
        );
        self.transport
            .notify(&ctx.submitter, "Processing... Please Wait")
            .await?;

        let finish = match self.drive(&mut ctx, &request, &cancel).await {
            Ok(finish) | Err(Halt::Finish(finish)) => finish,
            Err(Halt::Error(e)) => {
                abandon(&mut ctx, &e);
                return Err(e);
            }
        };
        ctx.transition_to(finish.state);
        self.transport.notify(&ctx.submitter, &finish.message).await?;

        Ok(SubmissionOutcome {
            id: ctx.id,
            state: finish.state,
            path: ctx.path(),
            message: finish.message,
            written: finish.written,
            session: ctx.session,
        })
    }

    async fn drive(
        &self,
        ctx: &mut SubmissionSession,
        request: &SubmissionRequest,
        cancel: &CancellationToken,
    ) -> Step<Finish> {
        self.intake(ctx, request)?;
        self.resolve_profile(ctx, cancel).await?;
        self.resolve_platform(ctx, cancel).await?;
        validate_classification(ctx)?;
        self.publish(ctx, cancel).await
    }

    /// Received → Extracted.
    fn intake(&self, ctx: &mut SubmissionSession, request: &SubmissionRequest) -> Step {
        if !is_zip_name(&request.archive_name) {
            return Err(end(
                SubmissionState::Rejected,
                "Please attach a zip file to the command.",
            ));
        }
        if let Some(dir) = &self.settings.archive_dir {
            match retain_archive(
                dir,
                &request.archive_name,
                &request.archive,
                request.received_at,
            ) {
                Ok(path) => log::debug!("Archive copy kept at {}", path.display()),
                Err(e) => log::warn!("Could not keep a copy of {}: {e}", request.archive_name),
            }
        }

        let contents = read_archive(&request.archive).map_err(|e| {
            log::warn!("[{}] Unreadable archive: {e}", ctx.submitter);
            let message = match e {
                SubmitError::MemberTooLarge { .. } => {
                    "One of the files in the zip archive is too large to be a dino export."
                }
                _ => "The attached file could not be opened as a zip archive.",
            };
            end(SubmissionState::Rejected, message)
        })?;

        let rules = &self.settings.rules;
        let server = match &contents.game_ini {
            Some(file) => Some(
                normalize(&file.bytes, &rules.game_ini)
                    .map_err(|e| encoding_rejection(&file.name, e))?,
            ),
            None => None,
        };

        let mut dinos = Vec::with_capacity(contents.dino_files.len());
        for file in &contents.dino_files {
            let normalized = normalize(&file.bytes, &rules.dino_ini)
                .map_err(|e| encoding_rejection(&file.name, e))?;
            let record = DinoRecord::from_document(&normalized.document).map_err(|e| {
                let e = e.with_file(&file.name);
                log::warn!("[{}] {e}", ctx.submitter);
                end(
                    SubmissionState::Rejected,
                    format!("One of the DinoExport files could not be read.\n{e}"),
                )
            })?;
            dinos.push(DinoSubmission {
                file_name: file.name.clone(),
                document: normalized.document,
                record,
            });
        }
        if dinos.is_empty() {
            return Err(end(
                SubmissionState::Rejected,
                "There aren't any DinoExport files in the zip file attached.\n\
                 Please make sure the files have not been renamed.",
            ));
        }

        let (config, text, mod_ids) = match server {
            Some(n) => (n.document, Some(n.text), n.mod_ids),
            None => (IniDocument::new(), None, None),
        };
        ctx.session = SessionRecord::extract(
            config,
            text.as_deref(),
            mod_ids,
            dinos.iter().map(|d| &d.record),
            &self.settings.mods,
            SessionProfile::Content,
        );
        ctx.dinos = dinos;
        ctx.transition_to(SubmissionState::Extracted);
        Ok(())
    }

    /// Unofficial upload without a usable `Game.ini`: ask what to do.
    async fn resolve_profile(&self, ctx: &mut SubmissionSession, cancel: &CancellationToken) -> Step {
        if ctx.official != UNOFFICIAL || ctx.session.has_config() {
            return Ok(());
        }
        ctx.transition_to(SubmissionState::ResolvingProfile);

        match self.choose(ctx, Prompt::MissingServerConfig, cancel).await? {
            Choice::TreatAsOfficial => {
                ctx.official = OFFICIAL.to_string();
                ctx.session.set_profile(SessionProfile::OfficialServer);
                self.status(ctx, "You chose to process as official.").await;
            }
            Choice::SupplyServerConfig => {
                let message = format!(
                    "You chose to provide the Game.ini file.\n\
                     I will wait {} for you to send a message containing the word `game` \
                     with a single file attached named `{GAME_INI}`",
                    describe(self.settings.timeouts.file())
                );
                self.status(ctx, &message).await;
                let file = self.await_file(ctx, cancel).await?;
                self.status(ctx, "File Received.").await;

                let normalized = normalize(&file.bytes, &self.settings.rules.game_ini)
                    .map_err(|e| encoding_rejection(&file.filename, e))?;
                ctx.session
                    .replace_config(normalized.document, &normalized.text, normalized.mod_ids);
            }
            _ => return Err(end(SubmissionState::Cancelled, CANCELLED_MESSAGE)),
        }
        Ok(())
    }

    /// Official upload without a `Game.ini`: singleplayer or server.
    async fn resolve_platform(&self, ctx: &mut SubmissionSession, cancel: &CancellationToken) -> Step {
        if !ctx.is_official() || ctx.session.has_config() {
            return Ok(());
        }
        if !ctx.singleplayer {
            ctx.transition_to(SubmissionState::ResolvingPlatform);
            match self.choose(ctx, Prompt::Platform, cancel).await? {
                Choice::Singleplayer => {
                    ctx.singleplayer = true;
                    self.status(ctx, "You selected SinglePlayer.").await;
                }
                _ => self.status(ctx, "You selected Server.").await,
            }
        }
        let profile = if ctx.singleplayer {
            SessionProfile::OfficialSingleplayer
        } else {
            SessionProfile::OfficialServer
        };
        ctx.session.set_profile(profile);
        Ok(())
    }

    /// Ask `prompt` until a recognized token arrives.
    async fn choose(
        &self,
        ctx: &SubmissionSession,
        prompt: Prompt,
        cancel: &CancellationToken,
    ) -> Step<Choice> {
        let submitter = &ctx.submitter;
        let ask = async {
            loop {
                let token = self.transport.ask(submitter, prompt).await?;
                match prompt.resolve(&token) {
                    Some(choice) => return Ok::<_, SubmitError>(choice),
                    None => log::debug!("[{submitter}] Ignoring reply {token:?}"),
                }
            }
        };
        match bounded(self.settings.timeouts.choice(), cancel, ask).await {
            Wait::Ready(choice) => Ok(choice?),
            Wait::TimedOut => Err(end(
                SubmissionState::TimedOut,
                "Game.ini is missing or not valid.\nCanceling request due to timeout.",
            )),
            Wait::Cancelled => Err(end(SubmissionState::Cancelled, CANCELLED_MESSAGE)),
        }
    }

    /// Wait for a follow-up message delivering `Game.ini`.
    async fn await_file(&self, ctx: &SubmissionSession, cancel: &CancellationToken) -> Step<Attachment> {
        let request = FileRequest::game_ini(&ctx.submitter);
        let wait = async {
            loop {
                let message = self.transport.next_message(&request.channel).await?;
                if !request.matches(&message) {
                    log::debug!(
                        "[{}] Ignoring message from {} while waiting for {GAME_INI}",
                        ctx.submitter,
                        message.author
                    );
                    continue;
                }
                if let Some(file) = message.attachments.into_iter().next() {
                    return Ok::<_, SubmitError>(file);
                }
            }
        };
        match bounded(self.settings.timeouts.file(), cancel, wait).await {
            Wait::Ready(file) => Ok(file?),
            Wait::TimedOut => Err(end(
                SubmissionState::TimedOut,
                "Timeout reached.\nYour request has been canceled.",
            )),
            Wait::Cancelled => Err(end(SubmissionState::Cancelled, CANCELLED_MESSAGE)),
        }
    }

    /// Publishing → Published, or → PublishedDegraded through the fallback.
    async fn publish(&self, ctx: &mut SubmissionSession, cancel: &CancellationToken) -> Step<Finish> {
        ctx.transition_to(SubmissionState::Publishing);
        let files = render_output(ctx);

        let guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(end(SubmissionState::Cancelled, CANCELLED_MESSAGE)),
            guard = self.lock.acquire() => guard,
        };
        let result = self.push_to_storage(ctx, &files).await;
        drop(guard);

        match result {
            Ok(written) => Ok(Finish {
                state: SubmissionState::Published,
                message: format!(
                    "Upload complete.\nUploaded {} dinos as {} {}",
                    ctx.dinos.len(),
                    ctx.official,
                    if ctx.singleplayer { "singleplayer" } else { "server" }
                ),
                written,
            }),
            Err(failure) => self.fallback(ctx, &files, failure).await,
        }
    }

    /// The sync → write → stage → commit → push sequence. Must run under the
    /// publish lock. Any failure after the sync rolls storage back to the
    /// synced state.
    async fn push_to_storage(
        &self,
        ctx: &SubmissionSession,
        files: &[OutputFile],
    ) -> Result<Vec<PathBuf>, PublishFailure> {
        let storage = &self.storage;
        self.status(ctx, "Processing... Syncing with storage").await;
        if let SyncResult::Failed(detail) = storage.sync().await {
            return Err(PublishFailure::new("pull", detail));
        }

        self.status(ctx, "Processing... Sync complete... Generating new files")
            .await;
        let submitter = path_component(&ctx.submitter.id);
        let label = path_component(&ctx.label());
        let dir = submission_dir(storage.root(), &submitter, &label);
        let pattern = format!("{submitter}/{label}");
        let written = match write_output(&dir, files) {
            Ok(written) => written,
            Err(e) => {
                self.rollback(ctx, &pattern, &[]).await;
                return Err(PublishFailure::new("write", e.to_string()));
            }
        };

        self.status(ctx, "Processing... Files generated... Committing changes")
            .await;
        if let SyncResult::Failed(detail) = storage.stage(&pattern).await {
            self.rollback(ctx, &pattern, &written).await;
            return Err(PublishFailure::new("add", detail));
        }
        if !storage.commit(&commit_message(ctx)).await {
            self.rollback(ctx, &pattern, &written).await;
            return Err(PublishFailure::new("commit", "nothing was committed"));
        }

        self.status(ctx, "Processing... Committed... Pushing files").await;
        if let SyncResult::Failed(detail) = storage.push().await {
            self.rollback(ctx, &pattern, &written).await;
            return Err(PublishFailure::new("push", detail));
        }
        Ok(written)
    }

    /// Drop the files this submission wrote, then reset storage so no
    /// commit or index entry of it survives.
    async fn rollback(&self, ctx: &SubmissionSession, pattern: &str, written: &[PathBuf]) {
        remove_output(written);
        if let SyncResult::Failed(detail) = self.storage.rollback(pattern).await {
            log::error!(
                "[{} {}] Could not roll back storage: {detail}",
                ctx.submitter,
                ctx.id
            );
        }
    }

    /// Keep the output locally and tell the operator.
    async fn fallback(
        &self,
        ctx: &SubmissionSession,
        files: &[OutputFile],
        failure: PublishFailure,
    ) -> Step<Finish> {
        log::error!(
            "[{} {}] git {} failed: {}",
            ctx.submitter,
            ctx.id,
            failure.stage,
            failure.detail
        );
        let notice = format!(
            "[{}] There was an error with git {} for {}\n{}",
            self.settings.operator, failure.stage, ctx.submitter, failure.detail
        );
        if let Err(e) = self.transport.notify_operator(&notice).await {
            log::error!("Could not notify the operator: {e}");
        }

        let dir = submission_dir(&self.settings.fallback_root, &ctx.submitter.id, &ctx.label());
        let written = write_output(&dir, files)?;
        log::warn!(
            "[{} {}] Stored {} files in {}",
            ctx.submitter,
            ctx.id,
            written.len(),
            dir.display()
        );
        Ok(Finish {
            state: SubmissionState::PublishedDegraded,
            message: "Your dinos were received, but they could not be published yet.\n\
                      The operator has been notified and your files are stored in a \
                      temporary location."
                .to_string(),
            written,
        })
    }

    /// Status narration. A lost status line is not worth failing over.
    async fn status(&self, ctx: &SubmissionSession, message: &str) {
        if let Err(e) = self.transport.notify(&ctx.submitter, message).await {
            log::warn!("[{}] Could not send status: {e}", ctx.submitter);
        }
    }
}

/// A collaborator failed mid-run; close the session before the error is
/// handed back.
fn abandon(ctx: &mut SubmissionSession, err: &SubmitError) {
    log::error!("[{} {}] {err}", ctx.submitter, ctx.id);
    ctx.transition_to(SubmissionState::Cancelled);
}

fn validate_classification(ctx: &SubmissionSession) -> Step {
    if ctx.official == OFFICIAL || ctx.official == UNOFFICIAL {
        return Ok(());
    }
    Err(end(
        SubmissionState::Rejected,
        format!(
            "{} is not a valid option.\n\
             Please specify \"{OFFICIAL}\" or \"{UNOFFICIAL}\" or leave it blank \
             to default to \"{UNOFFICIAL}\"",
            ctx.official
        ),
    ))
}

fn encoding_rejection(file: &str, err: IniError) -> Halt {
    log::warn!("{file}: {err}");
    end(
        SubmissionState::Rejected,
        "There was an encoding error with one of the files provided \
         and they cannot be processed",
    )
}

fn commit_message(ctx: &SubmissionSession) -> String {
    format!("Uploaded {} dinos {}", ctx.dinos.len(), ctx.official)
}

/// `Game.ini` first, then each export with its identifier under [`GUID_KEY`].
fn render_output(ctx: &SubmissionSession) -> Vec<OutputFile> {
    let mut files = Vec::with_capacity(ctx.dinos.len() + 1);
    files.push(OutputFile {
        name: GAME_INI.to_string(),
        contents: ctx.session.to_document().to_string(),
    });
    for dino in &ctx.dinos {
        let mut doc = dino.document.clone();
        doc.set(DINO_DATA_SECTION, GUID_KEY, dino.record.guid.to_canonical_string());
        files.push(OutputFile {
            name: dino.file_name.clone(),
            contents: doc.to_string(),
        });
    }
    files
}

/// `300s` → `5 minutes`, `45s` → `45 seconds`.
fn describe(d: Duration) -> String {
    let secs = d.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe(Duration::from_secs(300)), "5 minutes");
        assert_eq!(describe(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe(Duration::from_secs(45)), "45 seconds");
    }

    #[test]
    fn test_classification_literals() {
        let mut ctx = SubmissionSession::new(Submitter::new("1", "c"), OFFICIAL, false);
        assert!(validate_classification(&ctx).is_ok());
        ctx.official = "Official".to_string();
        assert!(matches!(
            validate_classification(&ctx),
            Err(Halt::Finish(Finish {
                state: SubmissionState::Rejected,
                ..
            }))
        ));
    }

    #[test]
    fn test_abandon_reaches_a_terminal_state() {
        let mut ctx = SubmissionSession::new(Submitter::new("1", "c"), UNOFFICIAL, false);
        ctx.transition_to(SubmissionState::Extracted);
        ctx.transition_to(SubmissionState::ResolvingProfile);

        abandon(&mut ctx, &SubmitError::transport("stdin closed"));

        assert_eq!(ctx.state, SubmissionState::Cancelled);
        assert!(ctx.ended_at.is_some());
        assert_eq!(ctx.path().last(), Some(&SubmissionState::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_outcomes() {
        let cancel = CancellationToken::new();
        let ready = bounded(Duration::from_secs(1), &cancel, async { 7 }).await;
        assert!(matches!(ready, Wait::Ready(7)));

        let pending = bounded(Duration::from_secs(60), &cancel, std::future::pending::<()>()).await;
        assert!(matches!(pending, Wait::TimedOut));

        cancel.cancel();
        let cancelled = bounded(Duration::from_secs(60), &cancel, async { 7 }).await;
        assert!(matches!(cancelled, Wait::Cancelled));
    }
}
