use super::{evaluate, generate};
use crate::core::{Catalog, Eligibility, Gene, Schedule};
use rand::prelude::*;
use std::cmp::Reverse;
use thiserror::Error;

/// Invalid genetic algorithm parameters.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("mutation rate must be a number within [0, 1], got {0}")]
    MutationRate(f64),
}

/// Parameters of a run. All of them are required.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    population_size: usize,
    generations_count: usize,
    mutation_rate: f64,
}

impl Config {
    /// Creates validated parameters.
    ///
    /// # Errors
    /// - If `population_size` is lower than 2.
    /// - If `mutation_rate` is not a number within [0, 1].
    pub fn new(
        population_size: usize,
        generations_count: usize,
        mutation_rate: f64,
    ) -> Result<Self, ConfigError> {
        if population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(population_size));
        }

        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(ConfigError::MutationRate(mutation_rate));
        }

        Ok(Self {
            population_size,
            generations_count,
            mutation_rate,
        })
    }

    #[must_use]
    pub const fn population_size(&self) -> usize {
        self.population_size
    }

    #[must_use]
    pub const fn generations_count(&self) -> usize {
        self.generations_count
    }

    #[must_use]
    pub const fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

/// State of a run after a generation has been evaluated.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Progress {
    /// Zero-based index of the evaluated generation.
    pub generation: usize,
    pub generations_count: usize,
    pub best_fitness: i64,
}

/// Result of a finished run.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    pub best: Schedule,
    pub fitness: i64,
    /// Number of evaluated generations.
    pub generations: usize,
}

#[derive(Clone, Debug)]
struct Scored {
    schedule: Schedule,
    fitness: i64,
}

impl Scored {
    fn new(schedule: Schedule) -> Self {
        let fitness = evaluate(&schedule);
        Self { schedule, fitness }
    }
}

/// Genetic algorithm searching for a conflict-free schedule.
///
/// The better half of every generation is kept as is and used as the parents
/// of the other half. Children are built by uniform crossover and mutated with
/// the configured probability.
#[derive(Clone, Debug)]
pub struct Genetic {
    config: Config,
    rng: StdRng,
}

impl Genetic {
    /// Creates a genetic algorithm with a deterministic random source.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self { config, rng }
    }

    /// Creates a genetic algorithm seeded from the operating system.
    #[must_use]
    pub fn from_entropy(config: Config) -> Self {
        let rng = StdRng::from_entropy();
        Self { config, rng }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the search until a conflict-free schedule is found or the last
    /// generation is evaluated. At least one generation is always evaluated.
    /// `on_generation` is called after every evaluation.
    pub fn run(&mut self, catalog: &Catalog, on_generation: &mut dyn FnMut(Progress)) -> Outcome {
        let size = self.config.population_size;
        let mut population: Vec<Schedule> =
            (0..size).map(|_| generate(catalog, &mut self.rng)).collect();

        let mut generation = 0;
        loop {
            let mut scored: Vec<_> = population.into_iter().map(Scored::new).collect();
            scored.sort_by_key(|solution| Reverse(solution.fitness));

            let best_fitness = scored.first().map_or(0, |solution| solution.fitness);
            on_generation(Progress {
                generation,
                generations_count: self.config.generations_count,
                best_fitness,
            });

            if best_fitness == 0 || generation + 1 >= self.config.generations_count {
                let Some(best) = scored.into_iter().next() else {
                    unreachable!("Population size is at least 2");
                };
                return Outcome {
                    best: best.schedule,
                    fitness: best.fitness,
                    generations: generation + 1,
                };
            }

            population = self.breed(catalog, scored);
            generation += 1;
        }
    }

    fn breed(&mut self, catalog: &Catalog, scored: Vec<Scored>) -> Vec<Schedule> {
        let size = self.config.population_size;
        let elite = size / 2;

        let mut next: Vec<Schedule> = Vec::with_capacity(size);
        next.extend(scored.into_iter().take(elite).map(|solution| solution.schedule));

        while next.len() < size {
            // A single elite is paired with itself.
            let mut parents = next[..elite].choose_multiple(&mut self.rng, 2);
            let first = parents.next();
            let (Some(first), Some(second)) = (first, parents.next().or(first)) else {
                unreachable!("Elite pool is never empty");
            };
            let mut child = crossover(first, second, &mut self.rng);

            if self.rng.gen::<f64>() < self.config.mutation_rate {
                mutate(&mut child, catalog, &mut self.rng);
            }

            next.push(child);
        }

        next
    }
}

/// Builds a child taking every gene from either parent with equal odds.
#[must_use]
pub fn crossover(first: &[Gene], second: &[Gene], rng: &mut impl Rng) -> Schedule {
    debug_assert_eq!(first.len(), second.len(), "Parents must have equal length");

    first
        .iter()
        .zip(second)
        .map(|(a, b)| if rng.gen::<f64>() > 0.5 { a } else { b })
        .cloned()
        .collect()
}

/// Redraws the day, time slot, teacher and room of one random gene.
/// Groups are never changed. Returns the index of the mutated gene, or `None`
/// if the schedule is empty or the gene's partition is no longer eligible.
pub fn mutate(schedule: &mut [Gene], catalog: &Catalog, rng: &mut impl Rng) -> Option<usize> {
    if schedule.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..schedule.len());
    let gene = &mut schedule[index];

    let eligibility = Eligibility::resolve(catalog, gene.subject_partition_id)?;
    let (day_id, time_id, teacher_id, room_id) = eligibility.sample(catalog, rng)?;

    gene.day_id = day_id;
    gene.time_id = time_id;
    gene.teacher_id = teacher_id;
    gene.room_id = room_id;

    Some(index)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algo::test::fixture;
    use crate::core::LessonType;

    fn config(population: usize, generations: usize, mutation: f64) -> anyhow::Result<Config> {
        Ok(Config::new(population, generations, mutation)?)
    }

    #[test]
    fn config_should_be_validated() {
        assert_eq!(Config::new(1, 10, 0.1), Err(ConfigError::PopulationTooSmall(1)));
        assert_eq!(Config::new(0, 10, 0.1), Err(ConfigError::PopulationTooSmall(0)));
        assert_eq!(Config::new(4, 10, 1.5), Err(ConfigError::MutationRate(1.5)));
        assert_eq!(Config::new(4, 10, -0.1), Err(ConfigError::MutationRate(-0.1)));
        assert!(Config::new(4, 10, f64::NAN).is_err());
        assert!(Config::new(2, 0, 0.0).is_ok());
        assert!(Config::new(2, 0, 1.0).is_ok());
    }

    #[test]
    fn crossover_of_same_parent_should_be_identity() {
        let catalog = fixture(LessonType::Practice, 3, 4, 5, 5);
        let mut rng = StdRng::seed_from_u64(1);
        let parent = generate(&catalog, &mut rng);

        for _ in 0..10 {
            assert_eq!(crossover(&parent, &parent, &mut rng), parent);
        }
    }

    #[test]
    fn crossover_should_take_genes_from_parents_in_place() {
        let catalog = fixture(LessonType::Practice, 3, 4, 5, 5);
        let mut rng = StdRng::seed_from_u64(2);
        let first = generate(&catalog, &mut rng);
        let second = generate(&catalog, &mut rng);

        let child = crossover(&first, &second, &mut rng);

        assert_eq!(child.len(), first.len());
        for (i, gene) in child.iter().enumerate() {
            assert!(*gene == first[i] || *gene == second[i]);
        }
    }

    #[test]
    fn mutation_should_change_only_one_gene() {
        let mut catalog = fixture(LessonType::Lecture, 3, 6, 6, 5);
        catalog.subject_partitions[0].teachers = vec![1, 2];
        let mut rng = StdRng::seed_from_u64(4);
        let original = generate(&catalog, &mut rng);

        for _ in 0..20 {
            let mut mutated = original.clone();
            let index = mutate(&mut mutated, &catalog, &mut rng);

            assert_eq!(mutated.len(), original.len());
            assert!(index.is_some());
            for (i, (before, after)) in original.iter().zip(&mutated).enumerate() {
                assert_eq!(before.group_ids, after.group_ids);
                assert_eq!(before.subject_partition_id, after.subject_partition_id);
                if Some(i) != index {
                    assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn mutation_of_empty_schedule_should_do_nothing() {
        let catalog = fixture(LessonType::Lecture, 1, 1, 1, 1);
        let mut schedule = Schedule::new();
        assert_eq!(mutate(&mut schedule, &catalog, &mut StdRng::seed_from_u64(0)), None);
    }

    #[test]
    fn zero_generations_should_evaluate_once() -> anyhow::Result<()> {
        let catalog = fixture(LessonType::Lecture, 3, 2, 1, 1);
        let mut calls = Vec::new();

        let outcome = Genetic::new(config(6, 0, 0.5)?, 0)
            .run(&catalog, &mut |progress| calls.push(progress.generation));

        assert_eq!(calls, vec![0]);
        assert_eq!(outcome.generations, 1);
        assert_eq!(outcome.fitness, evaluate(&outcome.best));
        Ok(())
    }

    #[test]
    fn single_conflict_free_lecture_should_finish_in_first_generation() -> anyhow::Result<()> {
        let catalog = fixture(LessonType::Lecture, 1, 1, 1, 1);

        let outcome = Genetic::new(config(4, 50, 0.1)?, 7).run(&catalog, &mut |_| {});

        assert_eq!(outcome.fitness, 0);
        assert_eq!(outcome.generations, 1);
        assert_eq!(outcome.best.len(), 1);
        Ok(())
    }

    #[test]
    fn unsolvable_instance_should_stop_at_generation_limit() -> anyhow::Result<()> {
        let catalog = fixture(LessonType::Lecture, 3, 2, 1, 1);
        let mut best = Vec::new();

        let outcome = Genetic::new(config(10, 25, 0.3)?, 5)
            .run(&catalog, &mut |progress| best.push(progress.best_fitness));

        assert_eq!(outcome.generations, 25);
        assert_eq!(best.len(), 25);
        assert_eq!(outcome.fitness, -3);
        assert!(best.iter().all(|&fitness| fitness == -3));
        Ok(())
    }

    #[test]
    fn search_should_improve_solvable_instance() -> anyhow::Result<()> {
        let catalog = fixture(LessonType::Practice, 4, 3, 6, 5);
        let mut history = Vec::new();

        let outcome = Genetic::new(config(30, 200, 0.5)?, 9)
            .run(&catalog, &mut |progress| history.push(progress.best_fitness));

        assert!(history.windows(2).all(|pair| pair[1] >= pair[0]));
        assert_eq!(outcome.fitness, *history.last().unwrap_or(&i64::MIN));
        assert!(outcome.fitness >= history[0]);
        Ok(())
    }

    #[test]
    fn same_seed_should_give_same_winner() -> anyhow::Result<()> {
        let catalog = fixture(LessonType::Practice, 4, 3, 3, 3);

        let first = Genetic::new(config(12, 30, 0.4)?, 42).run(&catalog, &mut |_| {});
        let second = Genetic::new(config(12, 30, 0.4)?, 42).run(&catalog, &mut |_| {});

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn smallest_population_should_not_panic() -> anyhow::Result<()> {
        let catalog = fixture(LessonType::Lecture, 3, 2, 1, 1);

        for population in 2..=3 {
            let outcome = Genetic::new(config(population, 5, 1.0)?, 3).run(&catalog, &mut |_| {});
            assert_eq!(outcome.generations, 5);
            assert_eq!(outcome.best.len(), 2);
        }
        Ok(())
    }

    #[test]
    fn empty_schedule_should_finish_immediately() -> anyhow::Result<()> {
        let mut catalog = fixture(LessonType::Lecture, 1, 1, 1, 1);
        catalog.rooms.clear();
        catalog.room_groups[0].rooms.clear();

        let outcome = Genetic::new(config(4, 10, 0.1)?, 0).run(&catalog, &mut |_| {});

        assert!(outcome.best.is_empty());
        assert_eq!((outcome.fitness, outcome.generations), (0, 1));
        Ok(())
    }
}
