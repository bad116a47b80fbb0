pub mod career_search;
pub mod expect;
pub mod registry;
pub mod sales_filtering;
pub mod state;

pub use registry::{StepContext, StepFn, StepRegistry};
pub use state::ScenarioState;

use crate::error::StepError;

/// Registry holding every step binding shipped with the suite.
pub fn default_registry() -> Result<StepRegistry, StepError> {
    let mut registry = StepRegistry::new();
    career_search::register(&mut registry)?;
    sales_filtering::register(&mut registry)?;
    Ok(registry)
}

/// Positional step argument.
pub(crate) fn arg(args: &[String], index: usize) -> Result<&str, StepError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| StepError::MissingState(format!("step argument {} was not captured", index)))
}
