use serde::{Deserialize, Serialize};

use crate::alerts::model::Notification;

/// Caller-owned batch of notifications for one viewer.
///
/// The engine stays pure; read flags live here, in the calling context, and
/// are discarded whenever a fresh evaluation replaces the batch. No locking
/// of its own: the owner is responsible for synchronization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole batch with a fresh evaluation. Read flags from the
    /// previous batch do not carry over.
    pub fn replace(&mut self, batch: Vec<Notification>) {
        self.notifications = batch;
    }

    /// Flip one notification to read by id match. Idempotent; returns whether
    /// the id exists in the current batch. Never re-evaluates.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Count of unread notifications, recomputed on every call.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Notifications in evaluation order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::model::{Notification, NotificationKind};
    use chrono::{TimeZone, Utc};

    fn batch() -> Vec<Notification> {
        let now = Utc.with_ymd_and_hms(2026, 3, 28, 8, 0, 0).unwrap();
        vec![
            Notification::new("2", NotificationKind::Success, "Balance Positivo", "ok".into(), now),
            Notification::new("5", NotificationKind::Error, "Cuentas Vencidas", "paga".into(), now),
        ]
    }

    #[test]
    fn unread_count_tracks_read_flags() {
        let mut feed = NotificationFeed::new();
        feed.replace(batch());
        assert_eq!(feed.unread_count(), 2);

        assert!(feed.mark_as_read("2"));
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn mark_as_read_is_idempotent() {
        let mut feed = NotificationFeed::new();
        feed.replace(batch());

        assert!(feed.mark_as_read("5"));
        let after_once = feed.notifications().to_vec();
        assert!(feed.mark_as_read("5"));
        assert_eq!(feed.notifications(), after_once.as_slice());
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn mark_as_read_touches_only_the_matching_id() {
        let mut feed = NotificationFeed::new();
        feed.replace(batch());
        feed.mark_as_read("2");
        assert!(feed.notifications()[0].read);
        assert!(!feed.notifications()[1].read);
    }

    #[test]
    fn mark_as_read_reports_unknown_ids() {
        let mut feed = NotificationFeed::new();
        feed.replace(batch());
        assert!(!feed.mark_as_read("99"));
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn replace_discards_previous_read_state() {
        let mut feed = NotificationFeed::new();
        feed.replace(batch());
        feed.mark_as_read("2");

        feed.replace(batch());
        assert_eq!(feed.unread_count(), 2);
        assert!(feed.notifications().iter().all(|n| !n.read));
    }
}
