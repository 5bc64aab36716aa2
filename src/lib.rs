//! Realty Backend - preference-matching notification engine for a
//! real-estate listing service

pub mod error;
pub mod notification;
pub mod property;
pub mod user;

pub use error::{StoreError, StoreResult};
pub use notification::{
    matcher, NewNotification, Notification, NotificationEngine, NotificationPage,
    NotificationStore, NotificationType, DEFAULT_LIST_LIMIT,
};
pub use property::{Property, PropertyChanges, PropertyStatus};
pub use user::{
    NotificationSettings, OptedInUser, StaticUserDirectory, UserDirectory, UserPreferences,
};
