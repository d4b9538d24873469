//! The single-request upload seam the coordinator drives.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FileMetadata;
use crate::payload::Payload;

/// Callback receiving upload progress as a percentage (0-100).
pub type ProgressFn<'a> = &'a mut (dyn FnMut(u8) + Send);

/// Moves one file's bytes to the remote service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Upload `payload` into the folder `folder_id`.
    ///
    /// Makes exactly one network attempt. `on_progress` is called zero or
    /// more times with non-decreasing percentages while the body is sent.
    async fn upload_one(
        &self,
        access_token: &str,
        folder_id: &str,
        payload: &Payload,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<FileMetadata>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn upload_one(
        &self,
        access_token: &str,
        folder_id: &str,
        payload: &Payload,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<FileMetadata> {
        (**self)
            .upload_one(access_token, folder_id, payload, on_progress)
            .await
    }
}

/// Turns byte counts into rounded percentages, suppressing repeats.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    total: u64,
    last: Option<u8>,
}

impl ProgressTracker {
    pub(crate) fn new(total: u64) -> Self {
        Self { total, last: None }
    }

    /// Percentage to report for `sent` bytes, or `None` if unchanged.
    pub(crate) fn update(&mut self, sent: u64) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let percent = ((sent.min(self.total) as f64 / self.total as f64) * 100.0).round() as u8;
        match self.last {
            Some(last) if percent <= last => None,
            _ => {
                self.last = Some(percent);
                Some(percent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_rounding() {
        let mut tracker = ProgressTracker::new(3);
        assert_eq!(tracker.update(1), Some(33));
        assert_eq!(tracker.update(2), Some(67));
        assert_eq!(tracker.update(3), Some(100));
    }

    #[test]
    fn test_progress_never_decreases() {
        let mut tracker = ProgressTracker::new(1000);
        assert_eq!(tracker.update(500), Some(50));
        assert_eq!(tracker.update(501), None);
        assert_eq!(tracker.update(100), None);
        assert_eq!(tracker.update(2000), Some(100));
    }

    #[test]
    fn test_empty_payload_reports_nothing() {
        let mut tracker = ProgressTracker::new(0);
        assert_eq!(tracker.update(0), None);
    }
}
