//! "Duplicates found" notification delivered to the presentation layer.

use serde::{Deserialize, Serialize};

/// Summary event for badge/notification components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateNotification {
    pub has_duplicates: bool,
    /// Number of duplicate groups
    pub count: usize,
}

/// Receiver for duplicate notifications.
///
/// Any `FnMut(&DuplicateNotification)` closure is a sink.
pub trait NotificationSink {
    fn notify(&mut self, notification: &DuplicateNotification);
}

impl<F> NotificationSink for F
where
    F: FnMut(&DuplicateNotification),
{
    fn notify(&mut self, notification: &DuplicateNotification) {
        (self)(notification)
    }
}
