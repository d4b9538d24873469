//! User-facing status messages and the shared slot that holds the current one.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Error,
    Success,
}

/// The coordinator's current user-facing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind {
            StatusKind::Info => "info",
            StatusKind::Error => "error",
            StatusKind::Success => "success",
        };
        write!(f, "[{}] {}", tag, self.text)
    }
}

/// Holds the current status and notifies subscribers on every write.
///
/// Each write bumps a revision so a deferred clear can tell whether the
/// status it was scheduled against has since been replaced.
#[derive(Debug)]
pub(crate) struct StatusBoard {
    tx: watch::Sender<Option<StatusMessage>>,
    revision: AtomicU64,
}

impl StatusBoard {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            revision: AtomicU64::new(0),
        }
    }

    pub(crate) fn current(&self) -> Option<StatusMessage> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Option<StatusMessage>> {
        self.tx.subscribe()
    }

    /// Replace the status and return the revision of the write.
    pub(crate) fn set(&self, message: StatusMessage) -> u64 {
        let mut revision = 0;
        // The revision is bumped under the channel's write lock so it stays
        // paired with the value it describes.
        self.tx.send_modify(|current| {
            revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            *current = Some(message);
        });
        revision
    }

    /// Clear the status only if nothing was written after `revision`.
    pub(crate) fn clear_if_current(&self, revision: u64) -> bool {
        self.tx.send_if_modified(|current| {
            if self.revision.load(Ordering::SeqCst) == revision && current.is_some() {
                *current = None;
                true
            } else {
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_only_matching_revision() {
        let board = StatusBoard::new();
        let first = board.set(StatusMessage::success("done"));
        let second = board.set(StatusMessage::info("next"));

        assert!(!board.clear_if_current(first));
        assert_eq!(board.current(), Some(StatusMessage::info("next")));

        assert!(board.clear_if_current(second));
        assert_eq!(board.current(), None);
    }

    #[test]
    fn test_subscribers_see_writes() {
        let board = StatusBoard::new();
        let mut rx = board.subscribe();
        board.set(StatusMessage::error("boom"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().clone(),
            Some(StatusMessage::error("boom"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StatusMessage::success("Files uploaded successfully.").to_string(),
            "[success] Files uploaded successfully."
        );
    }
}
