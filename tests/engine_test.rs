//! End-to-end tests for the notification engine through the public API

use std::sync::Arc;
use std::time::Duration;

use realty_backend::{
    NotificationEngine, NotificationSettings, NotificationStore, OptedInUser, Property,
    PropertyStatus, StaticUserDirectory, UserPreferences,
};
use tempfile::TempDir;

fn property(id: &str, location: &str, property_type: &str) -> Property {
    Property {
        id: id.to_string(),
        title: "Sunny 3-room apartment".to_string(),
        location: location.to_string(),
        property_type: property_type.to_string(),
        status: PropertyStatus::Available,
        is_public: true,
    }
}

fn user(id: &str, cities: &[&str], types: &[&str], opted_in: bool) -> OptedInUser {
    OptedInUser {
        id: id.to_string(),
        preferences: Some(UserPreferences {
            preferred_cities: cities.iter().map(|s| s.to_string()).collect(),
            preferred_property_types: types.iter().map(|s| s.to_string()).collect(),
            notification_settings: NotificationSettings {
                new_properties: opted_in,
                ..NotificationSettings::default()
            },
        }),
    }
}

fn setup(users: Vec<OptedInUser>) -> (TempDir, Arc<NotificationStore>, NotificationEngine) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(NotificationStore::new(dir.path().join("notifications.jsonl")));
    let engine = NotificationEngine::new(store.clone(), Arc::new(StaticUserDirectory::new(users)));
    (dir, store, engine)
}

#[test]
fn test_full_lifecycle_create_update_sell() {
    // Given: two users, one watching Haifa, one watching villas anywhere
    let (_dir, store, engine) = setup(vec![
        user("city-watcher", &["Haifa"], &[], true),
        user("type-watcher", &[], &["Villa"], true),
    ]);

    // When: a Haifa apartment is listed
    let listed = property("prop-1", "Haifa", "Apartment");
    engine.process_created(&listed).unwrap();

    // Then: only the city watcher is notified
    assert_eq!(store.list_for_user("city-watcher", None).unwrap().unread_count, 1);
    assert_eq!(store.list_for_user("type-watcher", None).unwrap().unread_count, 0);

    // When: the listing changes type to Villa
    let mut retyped = listed.clone();
    retyped.property_type = "Villa".to_string();
    engine.process_updated(&listed, &retyped).unwrap();

    // Then: the type watcher is notified; the city watcher is deduped
    assert_eq!(store.list_for_user("city-watcher", None).unwrap().unread_count, 1);
    assert_eq!(store.list_for_user("type-watcher", None).unwrap().unread_count, 1);

    // When: the property sells
    let mut sold = retyped.clone();
    sold.status = PropertyStatus::Sold;
    engine.process_updated(&retyped, &sold).unwrap();

    // Then: all unread notifications for it are purged
    assert_eq!(store.list_for_user("city-watcher", None).unwrap().unread_count, 0);
    assert_eq!(store.list_for_user("type-watcher", None).unwrap().unread_count, 0);
}

#[test]
fn test_opted_out_users_never_notified() {
    let (_dir, store, engine) = setup(vec![user("muted", &["Haifa"], &["Apartment"], false)]);

    let listed = property("prop-1", "Haifa", "Apartment");
    engine.process_created(&listed).unwrap();

    assert_eq!(store.list_for_user("muted", None).unwrap().unread_count, 0);
}

#[test]
fn test_or_semantics_across_axes() {
    // Preferences on both axes; the property matches the city only
    let (_dir, store, engine) = setup(vec![user("u1", &["Haifa"], &["Villa"], true)]);

    let listed = property("prop-1", "Haifa", "Apartment");
    engine.process_created(&listed).unwrap();

    assert_eq!(store.list_for_user("u1", None).unwrap().unread_count, 1);
}

#[test]
fn test_substring_city_match_end_to_end() {
    let (_dir, store, engine) = setup(vec![user("u1", &["Tel Aviv"], &[], true)]);

    let listed = property("prop-1", "North Tel Aviv District", "Apartment");
    engine.process_created(&listed).unwrap();

    assert_eq!(store.list_for_user("u1", None).unwrap().unread_count, 1);
}

#[test]
fn test_read_history_survives_purge() {
    let (_dir, store, engine) = setup(vec![user("u1", &["Haifa"], &[], true)]);

    let listed = property("prop-1", "Haifa", "Apartment");
    engine.process_created(&listed).unwrap();

    let page = store.list_for_user("u1", None).unwrap();
    store.mark_read(&page.notifications[0].id, "u1").unwrap();

    let mut sold = listed.clone();
    sold.status = PropertyStatus::Sold;
    engine.process_updated(&listed, &sold).unwrap();

    // The read notification is retained as history
    let after = store.list_for_user("u1", None).unwrap();
    assert_eq!(after.notifications.len(), 1);
    assert!(after.notifications[0].read);
}

#[tokio::test]
async fn test_created_hook_is_fire_and_forget() {
    let (_dir, store, engine) = setup(vec![user("u1", &["Haifa"], &[], true)]);

    // The hook returns immediately; the write lands in the background
    engine.on_property_created(property("prop-1", "Haifa", "Apartment"));

    let mut unread = 0;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        unread = store.list_for_user("u1", None).unwrap().unread_count;
        if unread == 1 {
            break;
        }
    }
    assert_eq!(unread, 1);
}

#[tokio::test]
async fn test_status_changed_hook_purges_in_background() {
    let (_dir, store, engine) = setup(vec![user("u1", &["Haifa"], &[], true)]);

    let listed = property("prop-1", "Haifa", "Apartment");
    engine.process_created(&listed).unwrap();
    assert_eq!(store.list_for_user("u1", None).unwrap().unread_count, 1);

    let mut sold = listed.clone();
    sold.status = PropertyStatus::Sold;
    engine.on_property_status_changed(sold, PropertyStatus::Available, PropertyStatus::Sold);

    let mut unread = 1;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        unread = store.list_for_user("u1", None).unwrap().unread_count;
        if unread == 0 {
            break;
        }
    }
    assert_eq!(unread, 0);
}
