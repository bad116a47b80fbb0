use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::browser::page::{BrowserLauncher, LaunchOptions};
use crate::gherkin::model::{Feature, Scenario, Step};
use crate::runner::result::{scenario_status, ScenarioResult, Status, StepResult};
use crate::steps::registry::{StepContext, StepRegistry};
use crate::steps::state::ScenarioState;
use crate::world::context::ExecutionContext;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub launch: LaunchOptions,
    pub screenshots_dir: PathBuf,
    /// Only run scenarios carrying this tag (scenario or feature level)
    pub tag: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            launch: LaunchOptions::default(),
            screenshots_dir: PathBuf::from("screenshots"),
            tag: None,
        }
    }
}

/// Executes scenarios one at a time, each inside its own execution context.
pub struct ScenarioRunner<'a> {
    registry: &'a StepRegistry,
    launcher: &'a dyn BrowserLauncher,
    options: RunOptions,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(registry: &'a StepRegistry, launcher: &'a dyn BrowserLauncher, options: RunOptions) -> Self {
        Self {
            registry,
            launcher,
            options,
        }
    }

    /// Run every selected scenario of every feature, in file order.
    ///
    /// A scenario's context is released before the next one is acquired.
    pub fn run_features(&self, features: &[Feature]) -> Vec<ScenarioResult> {
        let mut results = Vec::new();
        for feature in features {
            for scenario in &feature.scenarios {
                if let Some(tag) = &self.options.tag {
                    if !scenario.has_tag(feature, tag) {
                        debug!(scenario = %scenario.name, tag = %tag, "scenario filtered out");
                        continue;
                    }
                }
                results.push(self.run_scenario(feature, scenario));
            }
        }
        results
    }

    /// Run one scenario to completion or to its first failing step.
    pub fn run_scenario(&self, feature: &Feature, scenario: &Scenario) -> ScenarioResult {
        let started = Instant::now();
        let test_case = scenario.test_case_id(feature);
        let steps: Vec<&Step> = feature.background.iter().chain(&scenario.steps).collect();

        info!(test_case = %test_case, scenario = %scenario.name, "starting scenario");

        let case_dir = self.options.screenshots_dir.join(&test_case);
        if let Err(e) = prepare_screenshot_dir(&case_dir) {
            warn!(dir = %case_dir.display(), error = %e, "could not prepare screenshot directory");
        }

        let mut world = ExecutionContext::new(self.options.launch.clone(), &self.options.screenshots_dir);
        let mut state = ScenarioState::new(&test_case);

        let base = ScenarioResult {
            id: test_case.clone(),
            name: scenario.name.clone(),
            feature: feature.name.clone(),
            tags: scenario.effective_tags(feature),
            status: Status::Errored,
            duration_ms: 0,
            error: None,
            steps: Vec::new(),
        };

        if let Err(e) = world.acquire(self.launcher) {
            error!(test_case = %test_case, error = %e, "could not open browser session");
            return ScenarioResult {
                status: Status::Errored,
                duration_ms: elapsed_ms(started),
                error: Some(format!("failed to open browser session: {}", e)),
                steps: steps.iter().map(|s| skipped(s)).collect(),
                ..base
            };
        }

        let step_results = self.execute_steps(&steps, &mut world, &mut state);
        let mut status = scenario_status(&step_results);

        if status == Status::Failed {
            match world.capture(&state.failure_label()) {
                Ok(Some(path)) => debug!(path = %path.display(), "failure screenshot captured"),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "failure screenshot could not be captured"),
            }
        }

        let mut teardown_error = None;
        if let Err(e) = world.release() {
            error!(test_case = %test_case, error = %e, "browser session did not close cleanly");
            teardown_error = Some(format!("failed to close browser session: {}", e));
            if status == Status::Passed {
                status = Status::Errored;
            }
        }

        match status {
            Status::Passed => info!(test_case = %test_case, "scenario passed"),
            _ => info!(test_case = %test_case, status = status.as_str(), "scenario did not pass"),
        }

        ScenarioResult {
            status,
            duration_ms: elapsed_ms(started),
            error: teardown_error,
            steps: step_results,
            ..base
        }
    }

    /// Execute steps in order. After each step the boundary screenshot is
    /// attempted first, then the outcome decides whether to go on; once a
    /// step fails, every later step is recorded as skipped.
    fn execute_steps(
        &self,
        steps: &[&Step],
        world: &mut ExecutionContext,
        state: &mut ScenarioState,
    ) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(steps.len());
        let mut stopped = false;

        for step in steps {
            if stopped {
                results.push(skipped(step));
                continue;
            }

            state.begin_step();
            let started = Instant::now();
            debug!(index = state.step_index, step = %step.text, "running step");

            let outcome = match self.registry.find(&step.text) {
                Ok(found) => {
                    let mut ctx = StepContext {
                        world: &mut *world,
                        state: &mut *state,
                    };
                    found.binding.call(&mut ctx, &found.args)
                }
                Err(e) => Err(e),
            };
            let duration_ms = elapsed_ms(started);

            let label = state.step_label();
            let screenshot = if state.step_captured() {
                Some(format!("{}.png", label))
            } else {
                match world.capture(&label) {
                    Ok(Some(_)) => Some(format!("{}.png", label)),
                    Ok(None) => None,
                    Err(e) => {
                        warn!(index = state.step_index, error = %e, "step screenshot could not be captured");
                        None
                    }
                }
            };

            let (status, error) = match outcome {
                Ok(()) => (Status::Passed, None),
                Err(e) if e.is_undefined() => (Status::Undefined, Some(e.to_string())),
                Err(e) => (Status::Failed, Some(e.to_string())),
            };

            if status != Status::Passed {
                warn!(index = state.step_index, step = %step.text, error = error.as_deref().unwrap_or(""), "step did not pass");
                stopped = true;
            }

            results.push(StepResult {
                keyword: step.keyword,
                text: step.text.clone(),
                status,
                duration_ms,
                error,
                screenshot,
            });
        }

        results
    }
}

fn skipped(step: &Step) -> StepResult {
    StepResult {
        keyword: step.keyword,
        text: step.text.clone(),
        status: Status::Skipped,
        duration_ms: 0,
        error: None,
        screenshot: None,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Create the test case's screenshot directory and clear stale `.png` files.
pub fn prepare_screenshot_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "png") {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}
