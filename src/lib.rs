//! drive_upload - Sequenced multi-file uploads to Google Drive.
//!
//! This library provides:
//! - A multipart upload client for the Drive v3 API with progress reporting
//! - Folder listing to choose an upload destination
//! - An upload coordinator that uploads a selection one file at a time and
//!   exposes progress and a user-facing status message
//!
//! # Example
//!
//! ```no_run
//! use drive_upload::{DriveClient, FolderBrowser, PendingItem, UploadCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut browser = FolderBrowser::new(DriveClient::new());
//!     browser.set_access_token("access-token");
//!     browser.fetch_folders().await;
//!
//!     let mut coordinator = UploadCoordinator::new(DriveClient::new());
//!     coordinator.select(vec![PendingItem::from_path("report.pdf")?]);
//!     coordinator.set_destination(browser.folders().first().cloned());
//!     coordinator.upload_all("access-token").await;
//!
//!     if let Some(status) = coordinator.status() {
//!         println!("{}", status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod coordinator;
pub mod error;
pub mod folders;
pub mod models;
pub mod payload;
pub mod status;
pub mod transport;
pub mod url_parser;

// Re-exports for convenience
pub use client::DriveClient;
pub use coordinator::{UploadCoordinator, STATUS_CLEAR_DELAY};
pub use error::{DriveError, Result};
pub use folders::FolderBrowser;
pub use models::{Destination, DriveFolder, FileMetadata};
pub use payload::{Payload, PendingItem};
pub use status::{StatusKind, StatusMessage};
pub use transport::{ProgressFn, Transport};
pub use url_parser::extract_folder_id;
