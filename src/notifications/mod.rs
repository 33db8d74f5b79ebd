//! User-facing notices (toasts) raised by the upload and playback paths.

use std::sync::Arc;
use vidport_core::{EventBus, Notice, NoticeLevel};

use crate::config::NotificationsConfig;

/// Sink for one-line user notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!("{}", notice.message),
        }
    }
}

/// Publishes notices on an [`EventBus`] for a presenting shell to subscribe to.
#[derive(Clone)]
pub struct BusNotifier {
    bus: Arc<EventBus>,
}

impl BusNotifier {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl Notifier for BusNotifier {
    fn notify(&self, notice: Notice) {
        self.bus.broadcast(notice);
    }
}

/// Fans a notice out to every configured target.
///
/// Delivery is fire-and-forget; targets cannot fail the caller.
#[derive(Default)]
pub struct NotificationManager {
    targets: Vec<Arc<dyn Notifier>>,
}

impl NotificationManager {
    pub fn new(config: &NotificationsConfig, bus: Arc<EventBus>) -> Self {
        let mut manager = Self::default();
        if config.log {
            manager = manager.with_target(Arc::new(LogNotifier));
        }
        manager.with_target(Arc::new(BusNotifier::new(bus)))
    }

    pub fn with_target(mut self, target: Arc<dyn Notifier>) -> Self {
        self.targets.push(target);
        self
    }

    /// Check if there are any notification targets
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

impl Notifier for NotificationManager {
    fn notify(&self, notice: Notice) {
        for target in &self.targets {
            target.notify(notice.clone());
        }
    }
}
