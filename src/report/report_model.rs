use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::error::ReportError;
use crate::report::labels::StepLabels;
use crate::report::screenshots::discover_step_screenshots;
use crate::runner::result::{scenario_status, ScenarioResult, Status};

// ============================================================================
// Report options
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,

    /// Prefix for screenshot links, relative to the report file
    pub screenshots_href: String,

    /// Rendered in the header when present; the only varying part of the output
    pub generated_at: Option<String>,

    /// Missing screenshot directories and unlabeled steps become errors
    /// instead of being omitted or labeled `Step N`
    pub strict: bool,

    /// Name/value rows for the environment panel, e.g. `("Mode", "headless")`
    pub environment: Vec<(String, String)>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Careers E2E Report".to_string(),
            screenshots_href: "../screenshots".to_string(),
            generated_at: None,
            strict: false,
            environment: Vec::new(),
        }
    }
}

// ============================================================================
// Report document
// ============================================================================

/// Pass/fail counts over the rendered test cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl ReportSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenshotEntry {
    pub index: u32,
    pub label: String,
    pub href: String,
}

/// One scenario as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub test_case: String,
    pub name: String,
    pub badge: Status,
    pub steps_run: usize,
    pub step_count: usize,
    pub duration_ms: u64,
    /// Setup/teardown error or the first failing step's message
    pub failure: Option<String>,
    pub screenshots: Vec<ScreenshotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: Option<String>,
    pub environment: Vec<(String, String)>,
    pub summary: ReportSummary,
    pub cases: Vec<CaseReport>,
}

impl ReportDocument {
    pub fn screenshot_count(&self) -> usize {
        self.cases.iter().map(|c| c.screenshots.len()).sum()
    }

    /// Cases whose badge is anything but `passed`, in report order.
    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| c.badge != Status::Passed)
    }
}

/// Pair each scenario result with its screenshots on disk.
///
/// In lenient mode a test case without a screenshot directory is left out
/// of the document.
pub fn build_report(
    results: &[ScenarioResult],
    screenshots_dir: &Path,
    labels: &StepLabels,
    options: &ReportOptions,
) -> Result<ReportDocument, ReportError> {
    let mut cases = Vec::with_capacity(results.len());

    for result in results {
        let shots = discover_step_screenshots(screenshots_dir, &result.id).map_err(|e| ReportError::Read {
            path: screenshots_dir.join(&result.id),
            source: e,
        })?;

        let Some(shots) = shots else {
            let path = screenshots_dir.join(&result.id);
            if options.strict {
                return Err(ReportError::MissingScreenshots {
                    test_case: result.id.clone(),
                    path,
                });
            }
            warn!(test_case = %result.id, dir = %path.display(), "no screenshot directory; omitting test case");
            continue;
        };

        let mut screenshots = Vec::with_capacity(shots.len());
        for shot in shots {
            let label = match labels.lookup(&result.id, shot.index) {
                Some(label) => label.to_string(),
                None if options.strict => {
                    return Err(ReportError::MissingLabel {
                        test_case: result.id.clone(),
                        index: shot.index,
                    });
                }
                None => labels.label(&result.id, shot.index),
            };
            screenshots.push(ScreenshotEntry {
                index: shot.index,
                label,
                href: format!(
                    "{}/{}/{}",
                    options.screenshots_href.trim_end_matches('/'),
                    result.id,
                    shot.file_name
                ),
            });
        }

        cases.push(CaseReport {
            test_case: result.id.clone(),
            name: result.name.clone(),
            badge: badge(result),
            steps_run: result
                .steps
                .iter()
                .filter(|s| s.status != Status::Skipped)
                .count(),
            step_count: result.steps.len(),
            duration_ms: result.duration_ms,
            failure: result
                .error
                .clone()
                .or_else(|| result.first_failure().and_then(|s| s.error.clone())),
            screenshots,
        });
    }

    let passed = cases.iter().filter(|c| c.badge == Status::Passed).count();
    let summary = ReportSummary {
        total: cases.len(),
        passed,
        failed: cases.len() - passed,
    };

    Ok(ReportDocument {
        title: options.title.clone(),
        generated_at: options.generated_at.clone(),
        environment: options.environment.clone(),
        summary,
        cases,
    })
}

/// Badge shown for a scenario: derived from its steps, so any failing step
/// shows `failed` even when later steps never ran.
pub fn badge(result: &ScenarioResult) -> Status {
    if result.status == Status::Errored || result.steps.is_empty() {
        return result.status;
    }
    scenario_status(&result.steps)
}
