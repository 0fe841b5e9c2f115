//! The notification record set.

use myesi_entity::notification::{Notification, NotificationId};

use crate::filter::{CategoryCounts, NotificationFilter};

/// Records held for the current identity.
///
/// Counts are always computed from the records themselves, so they cannot
/// drift from the set after a mutation. Ids are unique: inserting a record
/// whose id is already held replaces it.
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    records: Vec<Notification>,
}

impl NotificationStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `records`. Later duplicates of an id win.
    pub fn from_records(records: impl IntoIterator<Item = Notification>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Records matching `filter`, newest first. Ties keep insertion order.
    pub fn list(&self, filter: NotificationFilter) -> Vec<Notification> {
        let mut view: Vec<Notification> = self
            .records
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        view
    }

    /// The record with `id`.
    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.records.iter().find(|n| &n.id == id)
    }

    /// Whether a record with `id` is held.
    pub fn contains(&self, id: &NotificationId) -> bool {
        self.get(id).is_some()
    }

    /// Number of unread records.
    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|n| n.is_unread()).count()
    }

    /// Counts for every filter.
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts::tally(&self.records)
    }

    /// Marks the record read. Returns `false` when no such record is held
    /// or it was already read.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.records.iter_mut().find(|n| &n.id == id) {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    /// Marks every record read. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.records.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }

    /// Removes the record with `id`.
    pub fn remove(&mut self, id: &NotificationId) -> Option<Notification> {
        let index = self.records.iter().position(|n| &n.id == id)?;
        Some(self.records.remove(index))
    }

    /// Inserts `notification`, replacing a record with the same id.
    pub fn push(&mut self, notification: Notification) {
        match self.records.iter_mut().find(|n| n.id == notification.id) {
            Some(existing) => *existing = notification,
            None => self.records.push(notification),
        }
    }

    /// Replaces the whole set with freshly fetched records.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = Notification>) {
        self.records.clear();
        for record in records {
            self.push(record);
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
