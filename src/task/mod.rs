mod background;
mod composer;

pub use background::{BackgroundTask, Completion, Event, Observer, TaskHandle, POLL_INTERVAL};
pub use composer::ComposerTask;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A long-lasting task meant to be run by a [`BackgroundTask`].
pub trait ObservableTask: Send {
    /// Runs the task to completion, narrating its progress through the messenger.
    ///
    /// # Errors
    /// - If the task fails. The error is delivered to the observer as the result.
    fn execute(&mut self, messenger: &Messenger) -> anyhow::Result<TaskResult>;
}

/// Outcome kind a task may report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TaskStatus {
    Success,
    Failure,
}

/// Value returned by a finished task.
///
/// A composer run returns an empty result; its output is the stored lesson
/// table and the narrated messages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskResult {
    pub value: Option<serde_json::Value>,
    pub status: Option<TaskStatus>,
    pub logs: Option<Vec<String>>,
    pub message: Option<String>,
}

impl TaskResult {
    /// Creates a result with every field empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
            && self.status.is_none()
            && self.logs.is_none()
            && self.message.is_none()
    }
}

#[derive(Debug, Default)]
struct Messages {
    recent: Vec<String>,
    total: Vec<String>,
    progress: Option<f64>,
}

/// Status lines and progress shared between a running task and its observers.
#[derive(Clone, Debug, Default)]
pub struct Messenger {
    inner: Arc<Mutex<Messages>>,
}

impl Messenger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a status line and appends it to the history.
    pub fn make_message(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");

        let mut messages = self.lock();
        messages.recent.push(message.clone());
        messages.total.push(message);
    }

    /// Takes every status line queued since the previous call.
    #[must_use]
    pub fn recent_messages(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().recent)
    }

    /// Returns every status line made so far.
    #[must_use]
    pub fn total_messages(&self) -> Vec<String> {
        self.lock().total.clone()
    }

    /// Records the completion percentage of the task.
    pub fn set_progress(&self, percentage: f64) {
        self.lock().progress = Some(percentage.clamp(0.0, 100.0));
    }

    /// Returns the last recorded completion percentage, if any.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.lock().progress
    }

    fn lock(&self) -> MutexGuard<'_, Messages> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
