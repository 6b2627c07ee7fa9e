mod gene;
mod problem;
mod util;

pub use gene::*;
pub use problem::*;
pub use util::*;
