//! Operator-facing notifications.
//!
//! Every outcome the operator has to see (saved, rejected, failed to load)
//! lands here as a [`Notification`]. The embedding UI drains the log and
//! decides how long to show each one.

use std::collections::VecDeque;

/// Maximum notifications retained before the oldest are dropped.
pub const MAX_RETAINED: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

/// Bounded FIFO of pending notifications.
#[derive(Debug, Default)]
pub struct Notifications {
    pending: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::warn!(message = %notification.message, "Notify"),
            _ => tracing::info!(message = %notification.message, "Notify"),
        }
        if self.pending.len() == MAX_RETAINED {
            self.pending.pop_front();
        }
        self.pending.push_back(notification);
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.pending.back()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return everything pending, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_oldest_first_and_empties() {
        let mut log = Notifications::default();
        log.push(Notification::info("one"));
        log.push(Notification::error("two"));

        assert_eq!(log.latest().map(|n| n.kind), Some(NotificationKind::Error));
        let drained = log.drain();
        assert_eq!(drained[0].message, "one");
        assert_eq!(drained[1].message, "two");
        assert!(log.is_empty());
    }

    #[test]
    fn oldest_is_dropped_at_capacity() {
        let mut log = Notifications::default();
        for i in 0..=MAX_RETAINED {
            log.push(Notification::info(i.to_string()));
        }
        assert_eq!(log.len(), MAX_RETAINED);
        assert_eq!(log.drain()[0].message, "1");
    }
}
