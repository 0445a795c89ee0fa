//! Reelgate CLI: submit trailer uploads and follow their ingest progress.
//!
//! Set REELGATE_TOKEN and REELGATE_API_URL (or SERVICE_TOKEN / API_URL). Uses Bearer auth.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use reelgate_api_client::ApiClient;
use reelgate_cli::{
    exit_for, init_tracing, print_ingest_progress, transfer_printer, ConsoleNotifier,
};
use reelgate_core::{
    MediaFile, Notifier, ProgressUpdate, TracingNotifier, UploadRequest, UploaderConfig,
};
use reelgate_upload::UploadLifecycleController;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "reelgate", about = "Reelgate trailer upload CLI")]
struct Cli {
    /// Send the outcome to the log instead of the console
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a trailer with its pictures, then follow ingest progress
    Upload {
        /// Path to the trailer video
        #[arg(long)]
        video: PathBuf,
        /// Path to a picture (repeatable, sent in order)
        #[arg(long = "picture")]
        pictures: Vec<PathBuf>,
        /// One-line pitch
        #[arg(long)]
        log_line: String,
        /// Production year
        #[arg(long)]
        year: String,
        /// Lead star
        #[arg(long)]
        star1: String,
        #[arg(long)]
        star2: Option<String>,
        #[arg(long)]
        star3: Option<String>,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Trailer duration in milliseconds
        #[arg(long, default_value = "0")]
        duration_ms: u64,
        /// Exit after the upload is accepted
        #[arg(long)]
        no_watch: bool,
    },
    /// Query progress of an upload once
    Progress {
        /// Upload session ID returned by `upload`
        session_id: String,
    },
    /// Follow an existing upload until it completes
    Watch {
        /// Upload session ID returned by `upload`
        session_id: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn load_request(
    video: PathBuf,
    pictures: Vec<PathBuf>,
    fields: UploadRequest,
) -> anyhow::Result<UploadRequest> {
    let primary_file = MediaFile::load(&video).await?;
    let mut auxiliary_files = Vec::with_capacity(pictures.len());
    for picture in &pictures {
        auxiliary_files.push(MediaFile::load(picture).await?);
    }
    Ok(UploadRequest {
        primary_file: Some(primary_file),
        auxiliary_files,
        ..fields
    })
}

/// Cancel the watch on Ctrl-C.
fn cancel_on_ctrl_c(controller: &UploadLifecycleController) {
    let handle = controller.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling, waiting for the current progress query to finish...");
            handle.cancel();
        }
    });
}

async fn watch(controller: &mut UploadLifecycleController) -> anyhow::Result<ExitCode> {
    cancel_on_ctrl_c(controller);
    {
        let stream = controller.progress();
        futures::pin_mut!(stream);
        while let Some(item) = stream.next().await {
            match item {
                Ok(ProgressUpdate {
                    progress_percent, ..
                }) => print_ingest_progress(progress_percent),
                Err(err) => return exit_for(err),
            }
        }
    }
    print_json(controller.session())?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = UploaderConfig::from_env()
        .context("Failed to load configuration. Set REELGATE_TOKEN and REELGATE_API_URL")?;

    let client = ApiClient::from_config(&config)
        .context("Failed to create API client")?
        .with_transfer_observer(transfer_printer());
    let client = Arc::new(client);
    let notifier: Arc<dyn Notifier> = if cli.quiet {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    let mut controller = UploadLifecycleController::new(client.clone(), notifier, &config);

    match cli.command {
        Commands::Upload {
            video,
            pictures,
            log_line,
            year,
            star1,
            star2,
            star3,
            title,
            description,
            duration_ms,
            no_watch,
        } => {
            let fields = UploadRequest {
                title,
                description,
                duration_ms,
                log_line,
                production_year: year,
                star1,
                star2,
                star3,
                ..UploadRequest::default()
            };
            let request = load_request(video, pictures, fields).await?;

            if let Err(err) = controller.submit(&request).await {
                return exit_for(err);
            }

            if no_watch {
                print_json(controller.session())?;
                Ok(ExitCode::SUCCESS)
            } else {
                watch(&mut controller).await
            }
        }
        Commands::Progress { session_id } => {
            let response = client.get_upload_progress(&session_id).await?;
            print_json(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Watch { session_id } => {
            controller.resume(session_id)?;
            watch(&mut controller).await
        }
    }
}
