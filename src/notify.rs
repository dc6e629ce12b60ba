//! User-visible notices (the host shows them as toasts).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "semantix::notice", "{message}"),
            Level::Success => tracing::info!(target: "semantix::notice", success = true, "{message}"),
            Level::Error => tracing::error!(target: "semantix::notice", "{message}"),
        }
    }
}
