//! User-facing notifications.
//!
//! Screens publish through a [`Notifier`]; the front end drains the paired
//! [`NotificationReceiver`] and renders them however it likes.

use std::time::Duration;

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Success => "Éxito",
            Self::Error => "Error",
            Self::Warning => "Advertencia",
            Self::Info => "Información",
        }
    }

    /// How long the notification should stay visible.
    pub fn timeout(self) -> Duration {
        match self {
            Self::Success | Self::Info => Duration::from_secs(3),
            Self::Error => Duration::from_secs(5),
            Self::Warning => Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
    pub timeout: Duration,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            title: level.default_title().to_owned(),
            message: message.into(),
            timeout: level.timeout(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Sending half. Cheap to clone; publishing never blocks.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: flume::Sender<Notification>,
}

/// Receiving half.
#[derive(Debug, Clone)]
pub struct NotificationReceiver {
    rx: flume::Receiver<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, NotificationReceiver { rx })
    }

    pub fn publish(&self, notification: Notification) {
        debug!(
            "notification [{:?}] {}: {}",
            notification.level, notification.title, notification.message
        );
        // Nobody listening is fine; the message is simply dropped.
        if self.tx.send(notification).is_err() {
            debug!("notification dropped, receiver gone");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Notification::new(Level::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Notification::new(Level::Error, message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.publish(Notification::new(Level::Warning, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(Notification::new(Level::Info, message));
    }
}

impl NotificationReceiver {
    /// Everything published so far, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.rx.try_iter().collect()
    }

    pub async fn recv(&self) -> Option<Notification> {
        self.rx.recv_async().await.ok()
    }
}
