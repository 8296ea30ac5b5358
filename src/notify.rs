//! Status notifications emitted while a summary is being produced.
//!
//! Inject an [`Arc<dyn Notifier>`] via
//! [`crate::config::SummaryConfigBuilder::notifier`] to receive advisory
//! events ("fetching", "retrying", "succeeded", "failed"). Notifications are
//! never blocking and never change the outcome of a request.
//!
//! Each notification carries an [`OperationId`]. A sink is expected to show
//! only the latest notification per operation: a "retrying" notice replaces
//! the "fetching" notice for the same operation rather than stacking under
//! it. [`LatestNotifications`] implements exactly that and is what the tests
//! use; the CLI does the same with a single spinner line.
//!
//! # Example
//!
//! ```rust
//! use docbrief::notify::{LatestNotifications, Notifier};
//! use docbrief::SummaryConfig;
//! use std::sync::Arc;
//!
//! let latest = Arc::new(LatestNotifications::default());
//! let config = SummaryConfig::builder()
//!     .notifier(latest.clone() as Arc<dyn Notifier>)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Identifies one logical operation (e.g. "structure the summary").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operation id used for the free-form draft summary call.
pub const DRAFT_OPERATION: &str = "draft-summary";
/// Operation id used for the structuring attempts.
pub const STRUCTURE_OPERATION: &str = "structure-summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Fetching,
    Retrying,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub operation: OperationId,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(operation: &OperationId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            operation: operation.clone(),
            kind,
            message: message.into(),
        }
    }
}

/// Receives status notifications.
///
/// Implementations must be `Send + Sync`; the pipeline may run on any tokio
/// worker thread.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Discards every notification. Used when no notifier is configured.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Keeps the latest notification per operation, plus a count of everything
/// received.
#[derive(Default)]
pub struct LatestNotifications {
    latest: Mutex<HashMap<OperationId, Notification>>,
    received: Mutex<Vec<NotificationKind>>,
}

impl LatestNotifications {
    /// The notification currently shown for `operation`.
    pub fn latest(&self, operation: &str) -> Option<Notification> {
        self.latest
            .lock()
            .ok()?
            .get(&OperationId::new(operation))
            .cloned()
    }

    /// Every notification kind received, in order.
    pub fn history(&self) -> Vec<NotificationKind> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Notifier for LatestNotifications {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut latest) = self.latest.lock() {
            latest.insert(notification.operation.clone(), notification.clone());
        }
        if let Ok(mut received) = self.received.lock() {
            received.push(notification.kind);
        }
    }
}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type SharedNotifier = Arc<dyn Notifier>;
