mod fitness;
mod generator;
mod genetic;
mod persist;
mod report;

pub use fitness::evaluate;
pub use generator::{generate, nominal_length};
pub use genetic::{crossover, mutate, Config, ConfigError, Genetic, Outcome, Progress};
pub use persist::{lessons, persist};
pub use report::Breakdown;
