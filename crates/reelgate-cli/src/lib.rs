use std::process::ExitCode;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reelgate_api_client::TransferObserver;
use reelgate_core::{LifecycleError, Notification, Notifier, Severity, TransferProgress};

const BAR_WIDTH: usize = 30;

/// Render `percent` as a fixed-width text bar, e.g. `[#####-----]  50%`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * width / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

/// Transfer observer that redraws a bar on stderr whenever the percentage changes.
pub fn transfer_printer() -> TransferObserver {
    let last = Arc::new(AtomicU8::new(u8::MAX));
    Arc::new(move |progress: TransferProgress| {
        let percent = progress.percent();
        if last.swap(percent, Ordering::Relaxed) != percent {
            eprint!("\rSending   {}", progress_bar(percent, BAR_WIDTH));
            if percent == 100 {
                eprintln!();
            }
        }
    })
}

/// Print the ingest progress line for one poll.
pub fn print_ingest_progress(percent: u8) {
    eprint!("\rIngesting {}", progress_bar(percent, BAR_WIDTH));
    if percent >= 100 {
        eprintln!();
    }
}

/// Shows notifications on stderr.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => eprintln!("\n✔ {}", notification.message),
            Severity::Error => eprintln!("\n✘ {}", notification.message),
        }
    }
}

/// Map a lifecycle failure to the process outcome.
///
/// Failures that ended the session were already shown by the notifier, so they
/// only set the exit code. Anything else is returned for `main` to print.
pub fn exit_for(err: LifecycleError) -> anyhow::Result<ExitCode> {
    if err.is_terminal() {
        Ok(ExitCode::FAILURE)
    } else {
        Err(anyhow::anyhow!(err.user_message()))
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
