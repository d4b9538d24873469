//! Sequences multi-file uploads and keeps the observable upload state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{DriveError, Result};
use crate::models::Destination;
use crate::payload::PendingItem;
use crate::status::{StatusBoard, StatusMessage};
use crate::transport::Transport;

/// Delay after a successful batch before the status is cleared.
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_millis(2000);

const UPLOADING_MESSAGE: &str = "Uploading...";
const SUCCESS_MESSAGE: &str = "Files uploaded successfully.";
const FAILURE_MESSAGE: &str = "File upload failed. Please try again.";

/// Owns the pending selection, destination, progress and status of an
/// upload session and drives the transport one file at a time.
///
/// `upload_all` borrows the coordinator mutably, so batches on one
/// coordinator can never overlap. Observers read state through the getters
/// or follow it through [`subscribe_status`](Self::subscribe_status) and
/// [`subscribe_progress`](Self::subscribe_progress).
///
/// # Example
///
/// ```no_run
/// use drive_upload::{DriveClient, DriveFolder, Payload, PendingItem, UploadCoordinator};
///
/// # async fn run() {
/// let mut coordinator = UploadCoordinator::new(DriveClient::new());
/// coordinator.select(vec![PendingItem::new(Payload::new("a.txt", "hello"))]);
/// coordinator.set_destination(Some(DriveFolder::new("folder-id", "Reports")));
/// coordinator.upload_all("access-token").await;
/// println!("{:?}", coordinator.status());
/// # }
/// ```
pub struct UploadCoordinator<T> {
    transport: T,
    pending: Vec<PendingItem>,
    destination: Option<Destination>,
    progress: watch::Sender<u8>,
    status: Arc<StatusBoard>,
    clear_delay: Duration,
    clear_task: Option<JoinHandle<()>>,
}

impl<T: Transport> UploadCoordinator<T> {
    pub fn new(transport: T) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            transport,
            pending: Vec::new(),
            destination: None,
            progress,
            status: Arc::new(StatusBoard::new()),
            clear_delay: STATUS_CLEAR_DELAY,
            clear_task: None,
        }
    }

    /// Change how long a success status stays visible.
    pub fn with_status_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay = delay;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn pending(&self) -> &[PendingItem] {
        &self.pending
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Percentage of the file currently (or last) in flight.
    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.status.current()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.status.subscribe()
    }

    /// Replace the pending selection.
    pub fn select(&mut self, items: Vec<PendingItem>) {
        self.pending = items;
        if !self.pending.is_empty() {
            self.status.set(StatusMessage::info(format!(
                "{} files selected for upload.",
                self.pending.len()
            )));
        }
    }

    pub fn clear_selection(&mut self) {
        self.pending.clear();
    }

    pub fn set_destination(&mut self, destination: Option<Destination>) {
        self.destination = destination;
    }

    /// Upload every pending item, in order, to the destination.
    ///
    /// Failures never escape: they end the batch and become the status.
    /// After a failure the selection is kept so it can be retried.
    pub async fn upload_all(&mut self, access_token: &str) {
        let folder_id = match self.check_ready(access_token) {
            Ok(folder_id) => folder_id,
            Err(err) => {
                warn!("upload not started: {}", err);
                self.status.set(StatusMessage::error(err.to_string()));
                return;
            }
        };

        self.status.set(StatusMessage::info(UPLOADING_MESSAGE));
        self.progress.send_replace(0);
        info!(count = self.pending.len(), %folder_id, "uploading files");

        if let Err(err) = self.upload_sequentially(access_token, &folder_id).await {
            error!("file upload error: {}", err);
            self.status.set(StatusMessage::error(FAILURE_MESSAGE));
            return;
        }

        info!(count = self.pending.len(), "all files uploaded");
        let revision = self.status.set(StatusMessage::success(SUCCESS_MESSAGE));
        self.pending.clear();
        self.schedule_status_clear(revision);
    }

    /// Preconditions in fixed order: credential, destination, selection.
    fn check_ready(&self, access_token: &str) -> Result<String> {
        if access_token.is_empty() {
            return Err(DriveError::MissingCredential);
        }
        let destination = self
            .destination
            .as_ref()
            .ok_or(DriveError::MissingDestination)?;
        if self.pending.is_empty() {
            return Err(DriveError::EmptySelection);
        }
        Ok(destination.id.clone())
    }

    async fn upload_sequentially(&self, access_token: &str, folder_id: &str) -> Result<()> {
        let progress = &self.progress;
        let mut on_progress = |percent: u8| {
            progress.send_replace(percent);
        };

        for item in &self.pending {
            let metadata = self
                .transport
                .upload_one(access_token, folder_id, &item.payload, Some(&mut on_progress))
                .await?;
            info!(name = item.payload.name(), id = %metadata.id, "uploaded");
        }
        Ok(())
    }

    /// Clear the status after the delay unless something newer replaced it.
    fn schedule_status_clear(&mut self, revision: u64) {
        if let Some(task) = self.clear_task.take() {
            task.abort();
        }
        let status = Arc::clone(&self.status);
        let delay = self.clear_delay;
        self.clear_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.clear_if_current(revision);
        }));
    }
}

impl<T> Drop for UploadCoordinator<T> {
    fn drop(&mut self) {
        if let Some(task) = self.clear_task.take() {
            task.abort();
        }
    }
}
