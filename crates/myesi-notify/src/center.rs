//! Async facade over the notification feed and the local record set.

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use myesi_core::config::NotificationConfig;
use myesi_core::error::{AppError, ErrorKind};
use myesi_core::result::AppResult;
use myesi_entity::notification::{Notification, NotificationId, NotificationPreferences};

use crate::badge::badge_label;
use crate::filter::{CategoryCounts, NotificationFilter};
use crate::source::{NotificationQuery, NotificationSource};
use crate::store::NotificationStore;

/// Holds one session's notifications and keeps them in step with the feed.
///
/// Every mutation is sent to the feed first and applied locally only once
/// the feed accepts it, so a failed call leaves the local view untouched.
/// Reads never touch the network.
pub struct NotificationCenter {
    source: Arc<dyn NotificationSource>,
    store: RwLock<NotificationStore>,
    preferences: RwLock<Option<NotificationPreferences>>,
    request_timeout: Duration,
    badge_cap: usize,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("source", &self.source)
            .field("records", &self.read_store().len())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl NotificationCenter {
    /// Creates an empty center backed by `source`.
    pub fn new(source: Arc<dyn NotificationSource>, config: &NotificationConfig) -> Self {
        Self {
            source,
            store: RwLock::new(NotificationStore::new()),
            preferences: RwLock::new(None),
            request_timeout: config.refresh_timeout(),
            badge_cap: config.badge_cap,
        }
    }

    /// Replaces the local records with a fresh fetch. Returns the number of
    /// records held.
    pub async fn refresh(&self) -> AppResult<usize> {
        let page = self
            .call("refresh", self.source.fetch(&NotificationQuery::default()))
            .await?;

        let mut store = self.write_store();
        store.replace_all(page.notifications);
        let local_unread = store.unread_count();
        if page.unread_count != local_unread {
            debug!(
                server = page.unread_count,
                local = local_unread,
                "Server unread count disagrees with records; using local count"
            );
        }
        debug!(records = store.len(), unread = local_unread, "Notifications refreshed");
        Ok(store.len())
    }

    /// Asks the feed for a record that arrived since the last check and
    /// inserts it.
    pub async fn receive_arrival(&self) -> AppResult<Option<Notification>> {
        let arrival = self.call("arrival", self.source.poll_arrival()).await?;
        if let Some(notification) = &arrival {
            info!(
                id = %notification.id,
                kind = %notification.notification_type,
                "New notification received"
            );
            self.write_store().push(notification.clone());
        }
        Ok(arrival)
    }

    /// Records in `filter`, newest first.
    pub fn list(&self, filter: NotificationFilter) -> Vec<Notification> {
        self.read_store().list(filter)
    }

    /// The record with `id`.
    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.read_store().get(id).cloned()
    }

    /// Number of unread records.
    pub fn unread_count(&self) -> usize {
        self.read_store().unread_count()
    }

    /// Counts for every filter.
    pub fn counts(&self) -> CategoryCounts {
        self.read_store().counts()
    }

    /// The unread badge text.
    pub fn badge(&self) -> String {
        badge_label(self.unread_count(), self.badge_cap)
    }

    /// Marks a record read. A record that is not held is a no-op and the
    /// feed is not contacted. Returns whether the record changed.
    ///
    /// A record the feed no longer knows is dropped locally and reported as
    /// unchanged.
    pub async fn mark_read(&self, id: &NotificationId) -> AppResult<bool> {
        if !self.read_store().contains(id) {
            debug!(id = %id, "mark_read on unknown notification ignored");
            return Ok(false);
        }

        match self.call("mark_read", self.source.mark_read(id)).await {
            Ok(()) => Ok(self.write_store().mark_read(id)),
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(id = %id, "mark_read on notification deleted remotely");
                self.write_store().remove(id);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Marks every record read. Returns how many changed.
    pub async fn mark_all_read(&self) -> AppResult<usize> {
        self.call("mark_all_read", self.source.mark_all_read()).await?;
        let changed = self.write_store().mark_all_read();
        info!(changed = changed, "All notifications marked read");
        Ok(changed)
    }

    /// Deletes a record. A record that is not held is a no-op. A record
    /// the feed has already deleted is dropped locally.
    pub async fn remove(&self, id: &NotificationId) -> AppResult<Option<Notification>> {
        if !self.read_store().contains(id) {
            debug!(id = %id, "remove on unknown notification ignored");
            return Ok(None);
        }

        match self.call("delete", self.source.delete(id)).await {
            Ok(()) => Ok(self.write_store().remove(id)),
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(id = %id, "Notification already deleted remotely");
                Ok(self.write_store().remove(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Current preferences, fetched once and then served from cache.
    pub async fn preferences(&self) -> AppResult<NotificationPreferences> {
        let cached = self.read_preferences().clone();
        if let Some(cached) = cached {
            return Ok(cached);
        }
        self.reload_preferences().await
    }

    /// Fetches preferences from the feed, replacing the cache.
    pub async fn reload_preferences(&self) -> AppResult<NotificationPreferences> {
        let fetched = self.call("preferences", self.source.preferences()).await?;
        *self.write_preferences() = Some(fetched.clone());
        Ok(fetched)
    }

    /// Shallow-merges `patch` into the preferences. Keys absent from the
    /// patch keep their values.
    pub async fn update_preferences(
        &self,
        patch: &NotificationPreferences,
    ) -> AppResult<NotificationPreferences> {
        let mut merged = self.preferences().await?;
        self.call("update_preferences", self.source.update_preferences(patch))
            .await?;

        merged.merge(patch);
        *self.write_preferences() = Some(merged.clone());
        info!(keys = patch.len(), "Notification preferences updated");
        Ok(merged)
    }

    /// Drops every record and the preference cache.
    pub fn clear(&self) {
        *self.write_store() = NotificationStore::new();
        *self.write_preferences() = None;
    }

    /// Runs a feed call under the request timeout.
    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let result = match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(format!(
                "Notification {operation} timed out"
            ))),
        };
        if let Err(e) = &result {
            warn!(operation = %operation, error = %e, "Notification request failed");
        }
        result
    }

    fn read_store(&self) -> RwLockReadGuard<'_, NotificationStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, NotificationStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_preferences(&self) -> RwLockReadGuard<'_, Option<NotificationPreferences>> {
        self.preferences.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_preferences(&self) -> RwLockWriteGuard<'_, Option<NotificationPreferences>> {
        self.preferences.write().unwrap_or_else(|e| e.into_inner())
    }
}
