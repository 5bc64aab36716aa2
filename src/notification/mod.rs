//! Notification subsystem - matching, persistence and event fan-out
//!
//! # Design
//! 1. `matcher` is a pure predicate: property + preferences in, bool out
//! 2. `store` owns every notification row and its lifecycle rules
//! 3. `engine` reacts to property events and fans out in the background
//!
//! # Example
//! ```ignore
//! use realty_backend::{NotificationEngine, NotificationStore, StaticUserDirectory};
//! use std::sync::Arc;
//!
//! let store = Arc::new(NotificationStore::open_default());
//! let users = Arc::new(StaticUserDirectory::new(vec![]));
//! let engine = NotificationEngine::new(store, users);
//! engine.on_property_created(property); // returns before fan-out finishes
//! ```

pub mod engine;
pub mod matcher;
pub mod record;
pub mod store;

pub use engine::NotificationEngine;
pub use record::{NewNotification, Notification, NotificationType};
pub use store::{NotificationPage, NotificationStore, DEFAULT_LIST_LIMIT};
