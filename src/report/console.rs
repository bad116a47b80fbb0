use crate::runner::result::{ScenarioResult, Status};

// ============================================================================
// Console reporter: run summary for the terminal
// ============================================================================

/// Format a run summary for terminal output.
///
/// Produces output like:
/// ```text
/// ✓ PASS  TC001 Search for Test jobs and filter by Netherlands (6/6 steps)
/// ✗ FAIL  TC002 Filter Sales jobs by country (4/8 steps)
///     [FAIL] Step 4: I should be on the Sales jobs page (current URL should contain ...)
///
/// 2 scenarios (1 passed, 1 failed)
/// 14 steps (10 passed, 1 failed, 3 skipped)
/// ```
pub fn format_console_summary(results: &[ScenarioResult]) -> String {
    let mut out = String::new();

    for result in results {
        let marker = match result.status {
            Status::Passed => "\u{2713} PASS ",
            Status::Errored => "! ERROR",
            _ => "\u{2717} FAIL ",
        };
        let executed = result.steps.len() - result.count_steps(Status::Skipped);

        out.push_str(&format!(
            "{} {} {} ({}/{} steps)\n",
            marker,
            result.id,
            result.name,
            executed,
            result.steps.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for (i, step) in result.steps.iter().enumerate() {
            if matches!(step.status, Status::Failed | Status::Undefined) {
                let detail = step.error.as_deref().unwrap_or("step failed");
                out.push_str(&format!(
                    "    [{}] Step {}: {} ({})\n",
                    step.status.as_str().to_uppercase(),
                    i + 1,
                    step.text,
                    detail
                ));
            }
        }
    }

    if !results.is_empty() {
        out.push('\n');
    }
    out.push_str(&scenario_line(results));
    out.push_str(&step_line(results));
    out
}

fn scenario_line(results: &[ScenarioResult]) -> String {
    let counts = [Status::Passed, Status::Failed, Status::Errored]
        .into_iter()
        .map(|status| (status, results.iter().filter(|r| r.status == status).count()));
    format!(
        "{} scenario{} ({})\n",
        results.len(),
        plural(results.len()),
        breakdown(counts)
    )
}

fn step_line(results: &[ScenarioResult]) -> String {
    let total: usize = results.iter().map(|r| r.steps.len()).sum();
    let counts = [Status::Passed, Status::Failed, Status::Undefined, Status::Skipped]
        .into_iter()
        .map(|status| (status, results.iter().map(|r| r.count_steps(status)).sum::<usize>()));
    format!("{} step{} ({})\n", total, plural(total), breakdown(counts))
}

/// `1 passed, 2 failed`, leaving out zero counts.
fn breakdown(counts: impl Iterator<Item = (Status, usize)>) -> String {
    counts
        .filter(|(_, n)| *n > 0)
        .map(|(status, n)| format!("{} {}", n, status.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
