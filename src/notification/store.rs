//! Notification persistence - JSONL file storage with advisory locks
//!
//! One JSON object per line. Mutations load the full set, apply the change
//! and atomically replace the file under an exclusive lock; creates append.
//! Single-writer-per-row semantics, last writer wins.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use fs2::FileExt;
use serde::Serialize;
use tracing::debug;

use super::record::{NewNotification, Notification, NotificationType};
use crate::error::{StoreError, StoreResult};

/// Default page cap for `list_for_user`
pub const DEFAULT_LIST_LIMIT: usize = 50;

static CREATE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A page of notifications plus the true unread total
///
/// `unread_count` comes from a full count, not the capped page, so it stays
/// correct even when the listing is truncated.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// JSONL-backed notification store
pub struct NotificationStore {
    path: PathBuf,
}

impl NotificationStore {
    /// Store rooted at an explicit file (tests, alternate deployments)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at the default config location
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("realty-backend")
            .join("notifications.jsonl")
    }

    /// Insert a notification; fails `Validation` on blank title/message
    pub fn create(&self, input: NewNotification) -> StoreResult<Notification> {
        input.validate()?;

        let record = Notification {
            id: next_id(),
            user: input.user,
            kind: input.kind,
            title: input.title.trim().to_string(),
            message: input.message.trim().to_string(),
            property: input.property,
            read: false,
            read_at: None,
            created_at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let mut file = file;
        let line = serde_json::to_string(&record)?;
        let written = writeln!(file, "{}", line);
        file.unlock()?;
        written?;

        debug!(id = %record.id, user = %record.user, "Notification created");
        Ok(record)
    }

    /// Dedup lookup: an unread notification for the same (user, property, type)
    pub fn find_unread_for_user_and_property(
        &self,
        user_id: &str,
        property_id: &str,
        kind: NotificationType,
    ) -> StoreResult<Option<Notification>> {
        let records = self.load_all()?;
        Ok(records.into_iter().find(|n| {
            !n.read
                && n.user == user_id
                && n.kind == kind
                && n.property.as_deref() == Some(property_id)
        }))
    }

    /// Notifications for one user, newest first, capped; plus the full
    /// unread count
    pub fn list_for_user(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> StoreResult<NotificationPage> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let mut mine: Vec<Notification> = self
            .load_all()?
            .into_iter()
            .filter(|n| n.user == user_id)
            .collect();

        let unread_count = mine.iter().filter(|n| !n.read).count();

        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine.truncate(limit);

        Ok(NotificationPage {
            notifications: mine,
            unread_count,
        })
    }

    /// Mark one notification read; ownership-checked, idempotent
    /// (a repeat call re-stamps `read_at`)
    pub fn mark_read(&self, id: &str, user_id: &str) -> StoreResult<Notification> {
        self.mutate(|records| {
            let record = records
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or(StoreError::NotFound)?;
            if record.user != user_id {
                return Err(StoreError::Forbidden);
            }
            record.read = true;
            record.read_at = Some(Utc::now());
            Ok(record.clone())
        })
    }

    /// Mark every unread notification of one user read; returns count affected
    pub fn mark_all_read(&self, user_id: &str) -> StoreResult<usize> {
        self.mutate(|records| {
            let now = Utc::now();
            let mut affected = 0;
            for record in records.iter_mut().filter(|n| n.user == user_id && !n.read) {
                record.read = true;
                record.read_at = Some(now);
                affected += 1;
            }
            Ok(affected)
        })
    }

    /// Delete one notification; ownership-checked like `mark_read`
    pub fn delete(&self, id: &str, user_id: &str) -> StoreResult<()> {
        self.mutate(|records| {
            let idx = records
                .iter()
                .position(|n| n.id == id)
                .ok_or(StoreError::NotFound)?;
            if records[idx].user != user_id {
                return Err(StoreError::Forbidden);
            }
            records.remove(idx);
            Ok(())
        })
    }

    /// Delete all unread notifications referencing a property; read rows are
    /// retained as history. Returns count deleted.
    pub fn purge_unread_for_property(&self, property_id: &str) -> StoreResult<usize> {
        let deleted = self.mutate(|records| {
            let before = records.len();
            records.retain(|n| n.read || n.property.as_deref() != Some(property_id));
            Ok(before - records.len())
        })?;
        debug!(property = %property_id, deleted, "Purged unread notifications");
        Ok(deleted)
    }

    /// Read every record (no lock; reads are best-effort snapshots)
    fn load_all(&self) -> StoreResult<Vec<Notification>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_lines(&self.path)
    }

    /// Load, apply, atomically rewrite under an exclusive lock.
    /// Skips the rewrite when `apply` fails.
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Vec<Notification>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        lock.lock_exclusive()?;

        let outcome = read_lines(&self.path).and_then(|mut records| {
            let value = apply(&mut records)?;
            self.rewrite(&records)?;
            Ok(value)
        });

        lock.unlock()?;
        outcome
    }

    /// Write records to a temp file and atomically replace the store file
    fn rewrite(&self, records: &[Notification]) -> StoreResult<()> {
        let temp_path = self.path.with_extension("tmp");
        {
            let mut temp = File::create(&temp_path)?;
            for record in records {
                writeln!(temp, "{}", serde_json::to_string(record)?)?;
            }
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn read_lines(path: &Path) -> StoreResult<Vec<Notification>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

fn next_id() -> String {
    let seq = CREATE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("ntf-{}-{}", Utc::now().timestamp_millis(), seq)
}
