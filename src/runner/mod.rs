pub mod result;
pub mod scenario;

pub use result::{read_results, write_results, ScenarioResult, Status, StepResult};
pub use scenario::{RunOptions, ScenarioRunner};
