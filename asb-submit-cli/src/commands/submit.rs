use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio_util::sync::CancellationToken;

use asb_submit_lib::{
    GitStorage, Settings, SubmissionRequest, SubmissionState, Submitter, Workflow,
};

use crate::cli_types::SubmitArgs;
use crate::console::ConsoleTransport;
use crate::error::CliError;

/// Run one archive through the workflow against the configured git working
/// copy. Ctrl-C cancels a pending prompt.
pub(crate) async fn run_submit(settings: Settings, args: SubmitArgs) -> Result<(), CliError> {
    let bytes = std::fs::read(&args.archive)?;
    let archive_name = args
        .archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let storage = Arc::new(GitStorage::new(settings.storage_root.clone()));
    let transport = Arc::new(ConsoleTransport::new(args.submitter.clone()));
    let workflow = Workflow::new(settings, transport, storage);

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted");
                cancel.cancel();
            }
        })
    };

    let request = SubmissionRequest::new(
        Submitter::new(args.submitter, args.channel),
        archive_name,
        bytes,
    )
    .official(args.official)
    .singleplayer(args.singleplayer);
    let outcome = workflow.run(request, cancel).await;
    watcher.abort();
    let outcome = outcome?;

    let marker = match outcome.state {
        SubmissionState::Published => "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string(),
        SubmissionState::PublishedDegraded => {
            "!".if_supports_color(Stdout, |t| t.yellow()).to_string()
        }
        _ => "\u{2718}".if_supports_color(Stdout, |t| t.red()).to_string(),
    };
    log::info!(
        "{marker} {} ({})",
        outcome.state,
        outcome.id.if_supports_color(Stdout, |t| t.dimmed()),
    );
    for path in &outcome.written {
        log::info!("  {}", path.display());
    }

    match outcome.state {
        SubmissionState::Published | SubmissionState::PublishedDegraded => Ok(()),
        state => Err(CliError::Unpublished(state)),
    }
}
