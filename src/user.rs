//! User preferences and the opted-in user directory seam
//!
//! The user aggregate itself (registration, profile, credentials) lives in
//! another layer; the engine only needs the preference payload of users who
//! enabled new-property notifications.

use anyhow::Result;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Per-user notification toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Gating flag for the matching engine
    #[serde(default = "default_true")]
    pub new_properties: bool,
    #[serde(default = "default_true")]
    pub property_matches: bool,
    #[serde(default = "default_true")]
    pub property_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            new_properties: true,
            property_matches: true,
            property_updates: true,
        }
    }
}

/// Search preferences embedded in the user profile
///
/// Both lists may be empty; empty means "no opinion on this axis",
/// never "match everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub preferred_cities: Vec<String>,
    #[serde(default)]
    pub preferred_property_types: Vec<String>,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

/// A user as the engine sees it: an id and a preference payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptedInUser {
    pub id: String,
    /// Absent when the profile was created before preferences existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
}

/// Supplies the set of users eligible for new-property notifications
pub trait UserDirectory: Send + Sync {
    /// Users with `notification_settings.new_properties = true`
    fn find_opted_in(&self) -> Result<Vec<OptedInUser>>;
}

/// In-memory directory over a fixed user set (tests, CLI, single-node demos)
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: Vec<OptedInUser>,
}

impl StaticUserDirectory {
    pub fn new(users: Vec<OptedInUser>) -> Self {
        Self { users }
    }
}

impl UserDirectory for StaticUserDirectory {
    fn find_opted_in(&self) -> Result<Vec<OptedInUser>> {
        Ok(self
            .users
            .iter()
            .filter(|u| {
                u.preferences
                    .as_ref()
                    .map(|p| p.notification_settings.new_properties)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, new_properties: bool) -> OptedInUser {
        OptedInUser {
            id: id.to_string(),
            preferences: Some(UserPreferences {
                preferred_cities: vec!["Haifa".to_string()],
                preferred_property_types: Vec::new(),
                notification_settings: NotificationSettings {
                    new_properties,
                    ..NotificationSettings::default()
                },
            }),
        }
    }

    #[test]
    fn test_find_opted_in_filters_disabled_users() {
        let directory = StaticUserDirectory::new(vec![
            user("u1", true),
            user("u2", false),
            user("u3", true),
        ]);

        let opted_in = directory.find_opted_in().unwrap();
        let ids: Vec<&str> = opted_in.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[test]
    fn test_users_without_preferences_are_not_opted_in() {
        let directory = StaticUserDirectory::new(vec![OptedInUser {
            id: "u1".to_string(),
            preferences: None,
        }]);

        assert!(directory.find_opted_in().unwrap().is_empty());
    }

    #[test]
    fn test_notification_settings_default_to_enabled() {
        let settings = NotificationSettings::default();
        assert!(settings.new_properties);
        assert!(settings.property_matches);
        assert!(settings.property_updates);
    }

    #[test]
    fn test_preferences_deserialize_with_missing_fields() {
        // Older profiles may carry a partial payload
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"preferred_cities":["Haifa"]}"#).unwrap();
        assert_eq!(prefs.preferred_cities, vec!["Haifa"]);
        assert!(prefs.preferred_property_types.is_empty());
        assert!(prefs.notification_settings.new_properties);
    }
}
