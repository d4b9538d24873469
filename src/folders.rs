//! Token holder and folder list used to pick an upload destination.

use tracing::error;

use crate::client::DriveClient;
use crate::models::DriveFolder;

/// Keeps the current access token and the folders last fetched with it.
#[derive(Debug, Clone, Default)]
pub struct FolderBrowser {
    client: DriveClient,
    access_token: Option<String>,
    folders: Vec<DriveFolder>,
}

impl FolderBrowser {
    pub fn new(client: DriveClient) -> Self {
        Self {
            client,
            access_token: None,
            folders: Vec::new(),
        }
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn folders(&self) -> &[DriveFolder] {
        &self.folders
    }

    /// Look up a fetched folder by ID.
    pub fn find(&self, id: &str) -> Option<&DriveFolder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    /// Refresh the folder list.
    ///
    /// Without a token nothing is requested. Failures are logged and leave
    /// the previous list in place.
    pub async fn fetch_folders(&mut self) {
        let Some(token) = self.access_token.as_deref() else {
            error!("No access token available");
            return;
        };

        match self.client.list_folders(token).await {
            Ok(folders) => self.folders = folders,
            Err(err) => error!("Error fetching folders: {}", err),
        }
    }
}
