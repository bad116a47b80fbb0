/// Scenario-local state threaded through every step handler.
///
/// A fresh value is built for each scenario, so nothing carries over from
/// one scenario to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioState {
    /// Identifier keying this scenario's screenshots, e.g. `TC001`
    pub test_case: String,

    /// Current step index (1-based, 0 before the first step)
    pub step_index: usize,

    /// Whether the current step already wrote its own screenshot
    step_captured: bool,

    /// Result count observed before a filter was applied
    pub initial_results_count: Option<usize>,

    /// Category picked from the search dropdown
    pub selected_category: Option<String>,
}

impl ScenarioState {
    pub fn new(test_case: impl Into<String>) -> Self {
        ScenarioState {
            test_case: test_case.into(),
            step_index: 0,
            step_captured: false,
            initial_results_count: None,
            selected_category: None,
        }
    }

    /// Advance to the next step.
    pub fn begin_step(&mut self) {
        self.step_index += 1;
        self.step_captured = false;
    }

    pub fn mark_captured(&mut self) {
        self.step_captured = true;
    }

    pub fn step_captured(&self) -> bool {
        self.step_captured
    }

    /// Screenshot label for the current step: `TC001/TC001_step_03`.
    pub fn step_label(&self) -> String {
        step_screenshot_label(&self.test_case, self.step_index)
    }

    pub fn failure_label(&self) -> String {
        format!("{tc}/{tc}_failed", tc = self.test_case)
    }
}

/// `<tc>/<tc>_step_<NN>`, relative to the screenshots directory.
pub fn step_screenshot_label(test_case: &str, index: usize) -> String {
    format!("{tc}/{tc}_step_{index:02}", tc = test_case, index = index)
}
