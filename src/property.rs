//! Property snapshots - the listing fields the notification engine reads
//!
//! The engine never mutates property state; the CRUD layer hands it immutable
//! snapshots (old and new at update time).

use serde::{Deserialize, Serialize};

/// Listing availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Sold,
    Unavailable,
}

/// Property snapshot (the subset relevant to matching)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    /// Free-text city/area string
    pub location: String,
    /// Free-text category string ("Apartment", "Villa", ...)
    #[serde(rename = "type")]
    pub property_type: String,
    pub status: PropertyStatus,
    pub is_public: bool,
}

impl Property {
    /// Only available, public properties ever participate in matching
    pub fn is_qualifying(&self) -> bool {
        self.status == PropertyStatus::Available && self.is_public
    }
}

/// Trigger flags derived from an update, passed along with the update hook
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PropertyChanges {
    pub status_became_available: bool,
    pub location_changed: bool,
    pub type_changed: bool,
    pub became_public: bool,
}

impl PropertyChanges {
    /// Diff two snapshots of the same property
    pub fn between(old: &Property, new: &Property) -> Self {
        Self {
            status_became_available: old.status != PropertyStatus::Available
                && new.status == PropertyStatus::Available,
            location_changed: old.location != new.location,
            type_changed: old.property_type != new.property_type,
            became_public: !old.is_public && new.is_public,
        }
    }

    /// Status-only transition into available (the narrow status-update path)
    pub fn became_available() -> Self {
        Self {
            status_became_available: true,
            ..Self::default()
        }
    }

    pub fn any(&self) -> bool {
        self.status_became_available
            || self.location_changed
            || self.type_changed
            || self.became_public
    }
}
