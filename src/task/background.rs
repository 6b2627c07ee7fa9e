use super::{Messenger, ObservableTask, TaskResult};
use anyhow::anyhow;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{Builder, JoinHandle};
use std::time::{Duration, Instant};

/// Default delay between two progress reports.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a background run and its wall-clock duration.
/// Failures and panics of the task are delivered here as `Err`.
#[derive(Debug)]
pub struct Completion {
    pub result: anyhow::Result<TaskResult>,
    pub duration: Duration,
}

/// Receives the progress of a background run on the polling thread.
pub trait Observer: Send {
    /// Called with the completion percentage when one is known.
    fn on_progress(&mut self, _percentage: f64) {}

    /// Called once for every status line of the task.
    fn on_message(&mut self, message: &str);

    /// Called exactly once when the task has finished.
    fn on_finish(&mut self, completion: Completion);
}

/// Progress of a background run as a channel message.
#[derive(Debug)]
pub enum Event {
    Progress(f64),
    Message(String),
    Finished(Completion),
}

impl Observer for Sender<Event> {
    fn on_progress(&mut self, percentage: f64) {
        // A dropped receiver only means nobody is watching anymore.
        self.send(Event::Progress(percentage)).ok();
    }

    fn on_message(&mut self, message: &str) {
        self.send(Event::Message(message.to_owned())).ok();
    }

    fn on_finish(&mut self, completion: Completion) {
        self.send(Event::Finished(completion)).ok();
    }
}

/// Runs an [`ObservableTask`] on its own thread while a second thread
/// forwards its messages to an [`Observer`].
pub struct BackgroundTask<T> {
    task: T,
    messenger: Messenger,
    interval: Duration,
}

impl<T: ObservableTask + 'static> BackgroundTask<T> {
    #[must_use]
    pub fn new(task: T) -> Self {
        Self {
            task,
            messenger: Messenger::new(),
            interval: POLL_INTERVAL,
        }
    }

    /// Sets the delay between two progress reports.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Starts the task and its progress reporting. Returns immediately.
    ///
    /// # Errors
    /// - If a thread cannot be spawned.
    pub fn start(self, observer: impl Observer + 'static) -> std::io::Result<TaskHandle> {
        let Self {
            mut task,
            messenger,
            interval,
        } = self;
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);

        // Without a worker the poller sees a disconnected channel and still
        // delivers a completion.
        let poller_messenger = messenger.clone();
        let poller = Builder::new()
            .name("task-progress".into())
            .spawn(move || poll(&done_rx, &poller_messenger, observer, interval))?;

        let worker_messenger = messenger.clone();
        let worker = Builder::new()
            .name("background-task".into())
            .spawn(move || {
                let started = Instant::now();
                let result = catch_unwind(AssertUnwindSafe(|| task.execute(&worker_messenger)))
                    .unwrap_or_else(|payload| {
                        Err(anyhow!("task panicked: {}", panic_message(payload.as_ref())))
                    });
                let duration = started.elapsed();

                if done_tx.send(Completion { result, duration }).is_err() {
                    log::warn!("Progress thread stopped before the task finished");
                }
            })?;

        Ok(TaskHandle {
            messenger,
            worker,
            poller,
        })
    }
}

/// Handle of a started [`BackgroundTask`].
#[derive(Debug)]
pub struct TaskHandle {
    messenger: Messenger,
    worker: JoinHandle<()>,
    poller: JoinHandle<()>,
}

impl TaskHandle {
    /// Takes every status line not yet taken by anyone.
    #[must_use]
    pub fn recent_messages(&self) -> Vec<String> {
        self.messenger.recent_messages()
    }

    /// Returns every status line made so far.
    #[must_use]
    pub fn total_messages(&self) -> Vec<String> {
        self.messenger.total_messages()
    }

    /// Waits until the task has finished and the observer has been notified.
    ///
    /// # Errors
    /// - If the observer panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.worker.join()?;
        self.poller.join()
    }
}

fn poll(
    done: &Receiver<Completion>,
    messenger: &Messenger,
    mut observer: impl Observer,
    interval: Duration,
) {
    let completion = loop {
        match done.recv_timeout(interval) {
            Ok(completion) => break completion,
            Err(RecvTimeoutError::Timeout) => {
                if let Some(percentage) = messenger.progress() {
                    observer.on_progress(percentage);
                }
                forward(messenger, &mut observer);
            }
            Err(RecvTimeoutError::Disconnected) => {
                break Completion {
                    result: Err(anyhow!("task thread exited without a result")),
                    duration: Duration::ZERO,
                }
            }
        }
    };

    forward(messenger, &mut observer);
    observer.on_progress(100.0);
    observer.on_finish(completion);
}

fn forward(messenger: &Messenger, observer: &mut impl Observer) {
    for message in messenger.recent_messages() {
        observer.on_message(&message);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}
