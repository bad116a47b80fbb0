use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, ReportError};
use crate::gherkin::model::Keyword;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
    Undefined,
    /// The scenario could not be set up or torn down
    Errored,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Undefined => "undefined",
            Status::Errored => "errored",
        }
    }
}

/// Outcome of one executed (or skipped) step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub keyword: Keyword,
    pub text: String,
    pub status: Status,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Screenshot path relative to the screenshots directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Outcome of one scenario; an element of the results JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Test-case identifier keying the screenshots, e.g. `TC001`
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub feature: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Status,
    #[serde(default)]
    pub duration_ms: u64,
    /// Setup or teardown failure, as opposed to a failing step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepResult>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }

    pub fn count_steps(&self, status: Status) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    /// First step that did not pass or get skipped.
    pub fn first_failure(&self) -> Option<&StepResult> {
        self.steps
            .iter()
            .find(|s| matches!(s.status, Status::Failed | Status::Undefined))
    }
}

/// Scenario status derived from its steps: any failed or undefined step
/// fails the scenario, even when later steps were never reached.
pub fn scenario_status(steps: &[StepResult]) -> Status {
    if steps
        .iter()
        .any(|s| matches!(s.status, Status::Failed | Status::Undefined))
    {
        Status::Failed
    } else if steps.iter().all(|s| s.status == Status::Passed) {
        Status::Passed
    } else {
        Status::Skipped
    }
}

pub fn write_results(path: &Path, results: &[ScenarioResult]) -> Result<(), E2eError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| E2eError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(results).map_err(|e| E2eError::Json {
        context: "scenario results".into(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| E2eError::io(path, e))
}

pub fn read_results(path: &Path) -> Result<Vec<ScenarioResult>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ReportError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}
