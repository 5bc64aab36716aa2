//! Notification record and field validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewProperty,
    PropertyMatch,
    PropertyUpdate,
    System,
}

/// A single notification, exclusively owned by its user
///
/// Created by the engine only, never directly by a user action. The read
/// transition is one-way; there is no un-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Owning user
    pub user: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    /// Referenced property (absent for system notifications)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default)]
    pub read: bool,
    /// Stamped on the transition to read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification; id and timestamps are store-assigned
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user: String,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub property: Option<String>,
}

impl NewNotification {
    /// Title and message must be non-empty after trimming
    pub fn validate(&self) -> StoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(StoreError::Validation(
                "message must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
