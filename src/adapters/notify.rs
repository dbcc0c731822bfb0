use crate::domain::model::{Notification, NotificationLevel};
use crate::domain::ports::Notifier;
use std::sync::Mutex;

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        println!("✅ {}", message);
    }

    fn notify_error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

/// Emits notifications as tracing events.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(notification = "success", "{}", message);
    }

    fn notify_error(&self, message: &str) {
        tracing::error!(notification = "error", "{}", message);
    }
}

/// Keeps every notification in memory so a host UI can render and drain them.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        // 通知遺失不影響主流程
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Notification::new(level, message));
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NotificationLevel::Success)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NotificationLevel::Error)
    }

    /// 取出並清空目前累積的通知
    pub fn drain(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|mut entries| std::mem::take(&mut *entries))
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        self.drain();
    }
}

impl Notifier for MemoryNotifier {
    fn notify_success(&self, message: &str) {
        self.push(NotificationLevel::Success, message);
    }

    fn notify_error(&self, message: &str) {
        self.push(NotificationLevel::Error, message);
    }
}
