use super::{Messenger, ObservableTask, TaskResult};
use crate::algo::{nominal_length, persist, Breakdown, Genetic, Progress};
use crate::data::Repository;
use anyhow::Context;

/// Composes a timetable and stores it in the repository.
///
/// The repository is owned by the task for the whole run.
pub struct ComposerTask<R> {
    repository: R,
    genetic: Genetic,
}

impl<R: Repository + Send> ComposerTask<R> {
    #[must_use]
    pub const fn new(repository: R, genetic: Genetic) -> Self {
        Self {
            repository,
            genetic,
        }
    }

    /// Returns the repository back once the task is done with it.
    #[must_use]
    pub fn into_repository(self) -> R {
        self.repository
    }
}

impl<R: Repository + Send> ObservableTask for ComposerTask<R> {
    fn execute(&mut self, messenger: &Messenger) -> anyhow::Result<TaskResult> {
        let catalog = self.repository.catalog();
        let config = *self.genetic.config();

        messenger.make_message(format!(
            "Composing {} lessons for {} curricula: population {}, {} generations, mutation rate {}",
            nominal_length(catalog),
            catalog.curricula().len(),
            config.population_size(),
            config.generations_count(),
            config.mutation_rate(),
        ));

        let outcome = self.genetic.run(catalog, &mut |progress| {
            messenger.make_message(format!(
                "Generation {}: best fitness {}",
                progress.generation + 1,
                progress.best_fitness
            ));
            messenger.set_progress(percentage(progress));
        });

        // An empty winner never replaces an existing timetable.
        if outcome.best.is_empty() {
            log::warn!("Every requirement was skipped, the lesson table is kept");
            messenger.make_message("No lesson could be scheduled");
            messenger.make_message(format!(
                "0 lessons stored, table kept after {} generations",
                outcome.generations
            ));
            return Ok(TaskResult::empty());
        }

        let breakdown = Breakdown::new(catalog, &outcome.best).to_string();
        for line in breakdown.lines() {
            messenger.make_message(line);
        }

        let stored = persist(&mut self.repository, &outcome.best)
            .context("could not store the composed schedule")?;
        messenger.make_message(format!(
            "Stored {stored} lessons after {} generations, fitness {}",
            outcome.generations, outcome.fitness
        ));

        Ok(TaskResult::empty())
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(progress: Progress) -> f64 {
    let total = progress.generations_count.max(1);
    (progress.generation + 1) as f64 * 100.0 / total as f64
}
