//! Simulated notification feed.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use myesi_core::config::MockConfig;
use myesi_core::error::AppError;
use myesi_core::result::AppResult;
use myesi_entity::notification::{Notification, NotificationId, NotificationPreferences};
use myesi_notify::source::{NotificationPage, NotificationQuery, NotificationSource};

use super::fixtures::{demo_notifications, realtime_notification};
use super::simulate_latency;

/// [`NotificationSource`] holding server-side state in memory.
///
/// Starts with the demo records and default preferences. Mutations persist
/// for the lifetime of the source.
#[derive(Debug)]
pub struct MockNotificationSource {
    records: Mutex<Vec<Notification>>,
    preferences: Mutex<NotificationPreferences>,
    delays: MockConfig,
}

impl MockNotificationSource {
    /// A feed seeded with the demo records.
    pub fn new(delays: &MockConfig) -> Self {
        Self::with_records(delays, demo_notifications(Utc::now()))
    }

    /// A feed seeded with `records`.
    pub fn with_records(delays: &MockConfig, records: Vec<Notification>) -> Self {
        Self {
            records: Mutex::new(records),
            preferences: Mutex::new(NotificationPreferences::default()),
            delays: delays.clone(),
        }
    }

    /// Add a record on the server side, as if an event had occurred.
    pub fn inject(&self, notification: Notification) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.retain(|n| n.id != notification.id);
        records.insert(0, notification);
    }

    fn with_record<T>(
        &self,
        id: &NotificationId,
        f: impl FnOnce(&mut Vec<Notification>, usize) -> T,
    ) -> AppResult<T> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let index = records
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        Ok(f(&mut records, index))
    }
}

#[async_trait]
impl NotificationSource for MockNotificationSource {
    async fn fetch(&self, query: &NotificationQuery) -> AppResult<NotificationPage> {
        simulate_latency(self.delays.notification_delay_ms).await;
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(query.page(&records))
    }

    async fn mark_read(&self, id: &NotificationId) -> AppResult<()> {
        simulate_latency(self.delays.mutation_delay_ms).await;
        self.with_record(id, |records, i| records[i].read = true)
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        simulate_latency(self.delays.mutation_delay_ms).await;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.iter_mut().for_each(|n| n.read = true);
        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> AppResult<()> {
        simulate_latency(self.delays.mutation_delay_ms).await;
        self.with_record(id, |records, i| {
            records.remove(i);
        })
    }

    async fn preferences(&self) -> AppResult<NotificationPreferences> {
        simulate_latency(self.delays.mutation_delay_ms).await;
        Ok(self
            .preferences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    async fn update_preferences(&self, patch: &NotificationPreferences) -> AppResult<()> {
        simulate_latency(self.delays.mutation_delay_ms).await;
        self.preferences
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .merge(patch);
        debug!(keys = patch.len(), "Stored notification preferences");
        Ok(())
    }

    async fn poll_arrival(&self) -> AppResult<Option<Notification>> {
        let chance = self.delays.realtime_chance;
        if !chance.is_finite() || chance <= 0.0 {
            return Ok(None);
        }
        let chance = chance.min(1.0);
        let arrival = {
            let mut rng = rand::rng();
            if !rng.random_bool(chance) {
                return Ok(None);
            }
            realtime_notification(&mut rng, Utc::now())
        };

        info!(
            notification_id = %arrival.id,
            notification_type = %arrival.notification_type,
            "Simulated real-time notification"
        );
        self.inject(arrival.clone());
        Ok(Some(arrival))
    }
}
