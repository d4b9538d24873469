//! drive_upload CLI - Upload files into a Google Drive folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tracing::warn;

use drive_upload::{
    extract_folder_id, DriveClient, DriveFolder, FolderBrowser, PendingItem, StatusKind,
    StatusMessage, UploadCoordinator,
};

/// CLI tool for uploading files to Google Drive.
#[derive(Parser)]
#[command(name = "drive_upload")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OAuth access token for the Drive API.
    #[arg(long, env = "GOOGLE_DRIVE_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List folders visible to the token.
    Folders,

    /// Upload files to a folder, one at a time.
    Upload {
        /// File patterns to upload (supports glob patterns like *.pdf, file_{1,2,3}.txt).
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Destination folder URL or ID.
        #[arg(long, short = 't')]
        to: String,

        /// Override Content-Type for uploaded files
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = DriveClient::new();

    match cli.command {
        Commands::Folders => {
            let folders = client
                .list_folders(&cli.token)
                .await
                .context("Failed to list folders")?;

            if folders.is_empty() {
                println!("No folders found.");
            } else {
                println!("ID\tNAME");
                for folder in folders {
                    println!("{}", folder);
                }
            }
        }

        Commands::Upload {
            patterns,
            to,
            content_type,
        } => {
            let folder_id = extract_folder_id(&to)
                .with_context(|| format!("Invalid folder URL or ID: {}", to))?;

            let items = collect_files(&patterns)?
                .iter()
                .map(|path| -> Result<PendingItem> {
                    let mut item = PendingItem::from_path(path)
                        .with_context(|| format!("Failed to read {:?}", path))?;
                    if let Some(ref content_type) = content_type {
                        item.payload = item.payload.with_mime_type(content_type.as_str());
                    }
                    Ok(item)
                })
                .collect::<Result<Vec<_>>>()?;

            let mut browser = FolderBrowser::new(client.clone());
            browser.set_access_token(cli.token.as_str());
            browser.fetch_folders().await;
            let destination = browser
                .find(&folder_id)
                .cloned()
                .unwrap_or_else(|| DriveFolder::new(folder_id.as_str(), folder_id.as_str()));

            let mut coordinator = UploadCoordinator::new(client);
            let status_rx = coordinator.subscribe_status();
            let progress_rx = coordinator.subscribe_progress();

            for item in &items {
                println!("  {}", item);
            }
            coordinator.select(items);
            coordinator.set_destination(Some(destination));

            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
                    .progress_chars("#>-"),
            );

            tokio::select! {
                _ = coordinator.upload_all(&cli.token) => {}
                _ = follow_state(status_rx, progress_rx, bar.clone()) => {}
            }
            bar.finish_and_clear();

            match coordinator.status() {
                Some(StatusMessage {
                    kind: StatusKind::Error,
                    text,
                }) => anyhow::bail!(text),
                Some(status) => println!("{}", status),
                None => {}
            }
        }
    }

    Ok(())
}

/// Mirror coordinator state onto the progress bar until the channels close.
async fn follow_state(
    mut status_rx: watch::Receiver<Option<StatusMessage>>,
    mut progress_rx: watch::Receiver<u8>,
    bar: ProgressBar,
) {
    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(status) = status_rx.borrow_and_update().as_ref() {
                    bar.set_message(status.text.clone());
                }
            }
            changed = progress_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                bar.set_position(u64::from(*progress_rx.borrow_and_update()));
            }
        }
    }
}

/// Expand brace and glob patterns into a sorted, deduplicated file list.
fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            let matches: Vec<PathBuf> = glob(&expanded)
                .with_context(|| format!("Invalid glob pattern: {}", expanded))?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file())
                .collect();

            if matches.is_empty() {
                let path = PathBuf::from(&expanded);
                if path.is_file() {
                    files.push(path);
                } else {
                    warn!("No files matched pattern: {}", expanded);
                }
            } else {
                files.extend(matches);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Expand brace patterns like file_{1,2,3}.txt into multiple patterns.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(start) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let Some(len) = pattern[start..].find('}') else {
        return vec![pattern.to_string()];
    };
    let end = start + len;
    let (prefix, suffix) = (&pattern[..start], &pattern[end + 1..]);

    pattern[start + 1..end]
        .split(',')
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt.trim(), suffix)))
        .collect()
}
