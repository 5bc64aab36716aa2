//! Notification engine - reacts to property lifecycle events
//!
//! The CRUD layer fires a hook and responds to its own caller without
//! waiting: fan-out runs as a detached task, its errors are logged at the
//! task boundary and never roll back the property write. Inside a fan-out
//! the user scan is a sequential loop with independent per-user outcomes;
//! one failed write never aborts the rest.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use super::matcher;
use super::record::{NewNotification, NotificationType};
use super::store::NotificationStore;
use crate::property::{Property, PropertyChanges, PropertyStatus};
use crate::user::{OptedInUser, UserDirectory};

/// Orchestrates preference matching and notification writes
#[derive(Clone)]
pub struct NotificationEngine {
    store: Arc<NotificationStore>,
    users: Arc<dyn UserDirectory>,
}

impl NotificationEngine {
    pub fn new(store: Arc<NotificationStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    // ---- fire-and-forget hooks (CRUD layer entry points) ----

    /// Property-created hook: spawns fan-out and returns immediately
    pub fn on_property_created(&self, property: Property) {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.process_created(&property) {
                error!(property = %property.id, error = %e, "New-property fan-out failed");
            }
        });
    }

    /// Property-updated hook, given old and new snapshots
    pub fn on_property_updated(&self, old: Property, new: Property) {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.process_updated(&old, &new) {
                error!(property = %new.id, error = %e, "Update fan-out failed");
            }
        });
    }

    /// Property-status-changed hook (the narrow status-only update path)
    pub fn on_property_status_changed(
        &self,
        property: Property,
        old_status: PropertyStatus,
        new_status: PropertyStatus,
    ) {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.process_status_changed(&property, old_status, new_status) {
                error!(property = %property.id, error = %e, "Status-change fan-out failed");
            }
        });
    }

    // ---- synchronous processing (also the unit-test surface) ----

    /// Evaluate a freshly created property against every opted-in user.
    /// No dedup: a new property cannot already have notifications.
    /// Returns the number of notifications created.
    pub fn process_created(&self, property: &Property) -> Result<usize> {
        if !property.is_qualifying() {
            debug!(property = %property.id, "Property not available/public, skipping fan-out");
            return Ok(0);
        }

        let users = self.users.find_opted_in()?;
        info!(
            property = %property.id,
            users = users.len(),
            "Evaluating new property against opted-in users"
        );

        let mut created = 0;
        for user in &users {
            if !matcher::matches(property, user.preferences.as_ref()) {
                continue;
            }
            match self.store.create(match_notification(user, property)) {
                Ok(_) => created += 1,
                Err(e) => {
                    warn!(user = %user.id, property = %property.id, error = %e,
                        "Failed to create notification");
                }
            }
        }

        info!(property = %property.id, created, "New-property fan-out complete");
        Ok(created)
    }

    /// Handle an update given old and new snapshots: purge unread
    /// notifications when the property crossed out of availability, then
    /// fan out (dedup-gated) when a trigger flag fired and the new state
    /// still qualifies.
    pub fn process_updated(&self, old: &Property, new: &Property) -> Result<usize> {
        if old.status == PropertyStatus::Available
            && matches!(new.status, PropertyStatus::Sold | PropertyStatus::Unavailable)
        {
            self.purge(&new.id);
        }

        let changes = PropertyChanges::between(old, new);
        if !new.is_qualifying() || !changes.any() {
            return Ok(0);
        }
        self.fan_out_update(new, &changes)
    }

    /// Handle a direct status change (status-only update)
    pub fn process_status_changed(
        &self,
        property: &Property,
        old_status: PropertyStatus,
        new_status: PropertyStatus,
    ) -> Result<usize> {
        if old_status == PropertyStatus::Available
            && matches!(new_status, PropertyStatus::Sold | PropertyStatus::Unavailable)
        {
            self.purge(&property.id);
        }

        if old_status != PropertyStatus::Available
            && new_status == PropertyStatus::Available
            && property.is_public
        {
            return self.fan_out_update(property, &PropertyChanges::became_available());
        }

        Ok(0)
    }

    /// Fan out for an update. Dedup-gated: a user holding an unread
    /// notification for this property is not notified again. The
    /// check-then-create pair is not atomic; concurrent updates to the same
    /// property can race into a duplicate (accepted, see DESIGN.md).
    fn fan_out_update(&self, property: &Property, changes: &PropertyChanges) -> Result<usize> {
        let users = self.users.find_opted_in()?;
        debug!(
            property = %property.id,
            users = users.len(),
            ?changes,
            "Evaluating updated property against opted-in users"
        );

        let mut created = 0;
        for user in &users {
            if !matcher::matches(property, user.preferences.as_ref()) {
                continue;
            }

            let existing = match self.store.find_unread_for_user_and_property(
                &user.id,
                &property.id,
                NotificationType::NewProperty,
            ) {
                Ok(found) => found,
                Err(e) => {
                    warn!(user = %user.id, property = %property.id, error = %e,
                        "Dedup lookup failed");
                    continue;
                }
            };
            if existing.is_some() {
                debug!(user = %user.id, property = %property.id,
                    "Unread notification already exists, skipping");
                continue;
            }

            match self.store.create(match_notification(user, property)) {
                Ok(_) => created += 1,
                Err(e) => {
                    warn!(user = %user.id, property = %property.id, error = %e,
                        "Failed to create notification");
                }
            }
        }

        info!(property = %property.id, created, "Update fan-out complete");
        Ok(created)
    }

    fn purge(&self, property_id: &str) {
        match self.store.purge_unread_for_property(property_id) {
            Ok(purged) => {
                info!(property = %property_id, purged,
                    "Purged unread notifications for unavailable property");
            }
            Err(e) => {
                warn!(property = %property_id, error = %e, "Failed to purge notifications");
            }
        }
    }
}

fn match_notification(user: &OptedInUser, property: &Property) -> NewNotification {
    NewNotification {
        user: user.id.clone(),
        kind: NotificationType::NewProperty,
        title: "New property matching your preferences".to_string(),
        message: format!(
            "New property listed: {} in {}",
            property.title, property.location
        ),
        property: Some(property.id.clone()),
    }
}
