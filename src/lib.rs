#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::anyhow;
use std::path::Path;
use std::time::Duration;

pub mod algo;
pub mod core;
pub mod data;
pub mod task;

/// Composes a timetable for the store at the given path and stores it there.
/// The search runs on a background thread while this thread passes every
/// status line to `on_message`. Blocks until the run has finished.
///
/// The returned completion holds the task result, which may be an error.
///
/// # Errors
/// - If the store cannot be opened.
/// - If the background threads cannot be started or the observer panicked.
pub fn run_store(
    path: &Path,
    genetic: algo::Genetic,
    interval: Duration,
    mut on_message: impl FnMut(&str),
) -> anyhow::Result<task::Completion> {
    let store = data::JsonStore::open(path)?;
    let task = task::BackgroundTask::new(task::ComposerTask::new(store, genetic));

    let (sender, receiver) = crossbeam_channel::unbounded();
    let handle = task.with_interval(interval).start(sender)?;

    let mut completion = None;
    for event in receiver {
        match event {
            task::Event::Progress(percentage) => log::debug!("Progress {percentage:.1}%"),
            task::Event::Message(message) => on_message(&message),
            task::Event::Finished(finished) => completion = Some(finished),
        }
    }

    handle
        .join()
        .map_err(|_| anyhow!("Progress reporting thread panicked"))?;
    completion.ok_or_else(|| anyhow!("Task finished without reporting a result"))
}
