//! Integration tests for the notification center over the simulated feed.

mod helpers;

use std::sync::Arc;

use myesi_client::MockNotificationSource;
use myesi_core::config::MockConfig;
use myesi_entity::notification::{NotificationId, NotificationPreferences};
use myesi_notify::{
    NotificationCenter, NotificationFilter, NotificationPoller, NotificationQuery,
    NotificationSource,
};

fn ids(records: &[myesi_entity::notification::Notification]) -> Vec<&str> {
    records.iter().map(|n| n.id.as_str()).collect()
}

#[tokio::test]
async fn test_category_views_and_mark_read() {
    let (_source, center) = helpers::center_with(helpers::mixed_records());
    center.refresh().await.unwrap();

    assert_eq!(ids(&center.list(NotificationFilter::Cve)), vec!["1", "2"]);
    assert!(!ids(&center.list(NotificationFilter::Payment)).contains(&"1"));
    assert_eq!(ids(&center.list(NotificationFilter::Payment)), vec!["3", "4", "5"]);
    assert_eq!(center.unread_count(), 3);

    assert!(center.mark_read(&NotificationId::from(1)).await.unwrap());
    assert_eq!(center.unread_count(), 2);
    assert_eq!(center.badge(), "2");
}

#[tokio::test]
async fn test_remove_payment_record() {
    let (source, center) = helpers::center_with(helpers::mixed_records());
    center.refresh().await.unwrap();
    let before = center.list(NotificationFilter::All).len();

    let removed = center.remove(&NotificationId::from(3)).await.unwrap();
    assert_eq!(removed.map(|n| n.notification_type), Some("payment_failed".to_string()));

    assert!(!ids(&center.list(NotificationFilter::Payment)).contains(&"3"));
    assert_eq!(center.list(NotificationFilter::All).len(), before - 1);
    assert_eq!(center.unread_count(), 2);

    // the server forgot it too
    center.refresh().await.unwrap();
    assert_eq!(center.list(NotificationFilter::All).len(), before - 1);
    let page = source.fetch(&NotificationQuery::default()).await.unwrap();
    assert_eq!(page.total, before - 1);
}

#[tokio::test]
async fn test_mark_all_read_is_idempotent() {
    let (_source, center) = helpers::center_with(helpers::mixed_records());
    center.refresh().await.unwrap();

    assert_eq!(center.mark_all_read().await.unwrap(), 3);
    assert_eq!(center.unread_count(), 0);
    assert_eq!(center.mark_all_read().await.unwrap(), 0);
    assert_eq!(center.unread_count(), 0);
    assert_eq!(center.badge(), "");
}

#[tokio::test]
async fn test_unknown_id_is_noop() {
    let (_source, center) = helpers::center_with(helpers::mixed_records());
    center.refresh().await.unwrap();

    let missing = NotificationId::from(404);
    assert!(!center.mark_read(&missing).await.unwrap());
    assert!(center.remove(&missing).await.unwrap().is_none());
    assert_eq!(center.list(NotificationFilter::All).len(), 5);
}

#[tokio::test]
async fn test_record_deleted_remotely_is_noop() {
    let (source, center) = helpers::center_with(helpers::mixed_records());
    center.refresh().await.unwrap();

    let gone = NotificationId::from(1);
    source.delete(&gone).await.unwrap();

    assert!(!center.mark_read(&gone).await.unwrap());
    assert!(center.get(&gone).is_none());
    assert_eq!(center.list(NotificationFilter::All).len(), 4);
    assert_eq!(center.unread_count(), 2);

    let other = NotificationId::from(2);
    source.delete(&other).await.unwrap();
    let removed = center.remove(&other).await.unwrap();
    assert_eq!(removed.map(|n| n.notification_type), Some("cve_high".to_string()));
    assert!(!ids(&center.list(NotificationFilter::All)).contains(&"2"));
    assert_eq!(center.unread_count(), 1);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let (source, center) = helpers::center_with(Vec::new());
    let before = center.preferences().await.unwrap();

    let patch: NotificationPreferences = [(NotificationPreferences::CRITICAL_CVES, false)]
        .into_iter()
        .collect();
    center.update_preferences(&patch).await.unwrap();

    let after = center.preferences().await.unwrap();
    assert_eq!(after.get(NotificationPreferences::CRITICAL_CVES), Some(false));
    for (key, enabled) in before.iter() {
        if key != NotificationPreferences::CRITICAL_CVES {
            assert_eq!(after.get(key), Some(enabled), "{key} changed");
        }
    }

    let server = source.preferences().await.unwrap();
    assert_eq!(server, after);
    assert_eq!(center.reload_preferences().await.unwrap(), after);
}

#[tokio::test]
async fn test_demo_feed_counts() {
    let config = helpers::test_config();
    let source = Arc::new(MockNotificationSource::new(&config.mock));
    let center = NotificationCenter::new(source, &config.notifications);
    center.refresh().await.unwrap();

    let counts = center.counts();
    assert_eq!(counts.all, 7);
    assert_eq!(counts.unread, 4);
    assert_eq!(counts.cve, 3);
    assert_eq!(counts.payment, 4);

    let newest = center.list(NotificationFilter::All);
    assert_eq!(newest[0].detail_str("cveId"), Some("CVE-2024-1234"));
}

#[tokio::test]
async fn test_poll_tick_picks_up_arrival() {
    let mut config = helpers::test_config();
    config.mock = MockConfig {
        realtime_chance: 1.0,
        ..MockConfig::instant()
    };
    let source = Arc::new(MockNotificationSource::with_records(
        &config.mock,
        helpers::mixed_records(),
    ));
    let center = Arc::new(NotificationCenter::new(source, &config.notifications));

    NotificationPoller::new(Arc::clone(&center), &config.notifications)
        .tick()
        .await;

    assert_eq!(center.list(NotificationFilter::All).len(), 6);
    assert_eq!(center.unread_count(), 4);
    let newest = &center.list(NotificationFilter::Unread)[0];
    assert!(
        newest.notification_type == "cve_critical" || newest.notification_type == "payment_failed"
    );
}
