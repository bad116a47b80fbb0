use crate::report::report_model::{CaseReport, ReportDocument};

// ============================================================================
// HTML reporter: self-contained HTML report
// ============================================================================

/// Generate a self-contained HTML report.
///
/// Features:
/// - Green/red header based on overall pass/fail
/// - Summary line with pass/fail/total counts
/// - Environment panel (configured rows plus the screenshot total)
/// - Failed-scenario summary linking to each failing case
/// - One section per test case with a status badge
/// - Step screenshots in execution order, plus a quick-link list
/// - Inline CSS (no external dependencies)
///
/// Output depends only on the document, so regenerating from the same
/// results and screenshots yields the same bytes apart from `generated_at`.
pub fn generate_html_report(report: &ReportDocument) -> String {
    let all_passed = report.summary.all_passed();
    let header_color = if all_passed { "#4CAF50" } else { "#f44336" };
    let status_text = if all_passed {
        "ALL TESTS PASSED"
    } else {
        "SOME TESTS FAILED"
    };

    let generated = report
        .generated_at
        .as_deref()
        .map(|ts| format!("<p class=\"generated\">Generated {}</p>\n", escape_html(ts)))
        .unwrap_or_default();

    let environment = render_environment(report);
    let failed_summary = render_failed_summary(report);
    let test_cases: String = report.cases.iter().map(render_case).collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 1100px; margin: 20px auto; padding: 0 20px; }}
.test-case {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 16px; border-left: 4px solid #ccc; }}
.test-case.passed {{ border-left-color: #4CAF50; }}
.test-case.failed, .test-case.errored {{ border-left-color: #f44336; }}
.test-case h2 {{ margin: 0 0 8px 0; font-size: 18px; }}
.test-case p {{ margin: 4px 0; color: #666; font-size: 14px; }}
.test-case .error {{ color: #c62828; font-weight: bold; }}
.badge {{ display: inline-block; padding: 2px 8px; border-radius: 4px; color: white; font-size: 12px; text-transform: uppercase; vertical-align: middle; }}
.badge.passed {{ background: #4CAF50; }}
.badge.failed, .badge.undefined {{ background: #f44336; }}
.badge.errored {{ background: #ff9800; }}
.badge.skipped {{ background: #9e9e9e; }}
.panel {{ background: white; border-radius: 6px; padding: 12px 20px; margin-bottom: 16px; font-size: 14px; }}
.panel h2 {{ margin: 0 0 8px 0; font-size: 16px; }}
.panel table {{ border-collapse: collapse; }}
.panel th {{ text-align: left; padding: 2px 16px 2px 0; color: #666; font-weight: normal; }}
.panel.failed-summary {{ border-left: 4px solid #f44336; }}
.quick-links {{ columns: 2; font-size: 13px; }}
.screenshot {{ margin: 16px 0; padding: 12px; border: 1px solid #ddd; border-radius: 6px; background: #fafafa; }}
.screenshot h3 {{ margin: 0 0 8px 0; font-size: 15px; }}
.screenshot img {{ max-width: 100%; height: auto; border-radius: 4px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }}
</style>
</head>
<body>
<div class="header">
<h1>{status_text}</h1>
<p>{title}: {passed} passed, {failed} failed ({total} total)</p>
{generated}</div>
<div class="content">
{environment}{failed_summary}{test_cases}</div>
</body>
</html>
"##,
        title = escape_html(&report.title),
        header_color = header_color,
        status_text = status_text,
        passed = report.summary.passed,
        failed = report.summary.failed,
        total = report.summary.total,
        generated = generated,
        environment = environment,
        failed_summary = failed_summary,
        test_cases = test_cases,
    )
}

fn render_environment(report: &ReportDocument) -> String {
    let mut rows: String = report
        .environment
        .iter()
        .map(|(name, value)| format!("<tr><th>{}</th><td>{}</td></tr>\n", escape_html(name), escape_html(value)))
        .collect();
    rows.push_str(&format!(
        "<tr><th>Screenshots</th><td>{}</td></tr>\n",
        report.screenshot_count()
    ));
    format!("<div class=\"panel environment\">\n<h2>Environment</h2>\n<table>\n{}</table>\n</div>\n", rows)
}

fn render_failed_summary(report: &ReportDocument) -> String {
    let items: String = report
        .failed_cases()
        .map(|case| {
            let reason = case
                .failure
                .as_deref()
                .map(|f| format!(": {}", escape_html(f)))
                .unwrap_or_default();
            format!(
                "<li><a href=\"#{id}\">{id} - {name}</a> <span class=\"badge {badge}\">{badge}</span>{reason}</li>\n",
                id = escape_html(&case.test_case),
                name = escape_html(&case.name),
                badge = case.badge.as_str(),
                reason = reason,
            )
        })
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!(
        "<div class=\"panel failed-summary\">\n<h2>Failed scenarios</h2>\n<ul>\n{}</ul>\n</div>\n",
        items
    )
}

fn render_case(case: &CaseReport) -> String {
    let badge = case.badge.as_str();
    let mut out = format!(
        "<div class=\"test-case {badge}\" id=\"{anchor}\">\n<h2>{id} - {name} <span class=\"badge {badge}\">{badge}</span></h2>\n<p>Steps: {run}/{total} | Screenshots: {shots} | Duration: {secs:.1}s</p>\n",
        badge = badge,
        anchor = escape_html(&case.test_case),
        id = escape_html(&case.test_case),
        name = escape_html(&case.name),
        run = case.steps_run,
        total = case.step_count,
        shots = case.screenshots.len(),
        secs = case.duration_ms as f64 / 1000.0,
    );

    if let Some(ref failure) = case.failure {
        out.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(failure)));
    }

    if !case.screenshots.is_empty() {
        out.push_str("<ul class=\"quick-links\">\n");
        for shot in &case.screenshots {
            out.push_str(&format!(
                "<li><a href=\"{href}\" target=\"_blank\">Step {index:02}: {label}</a></li>\n",
                href = escape_html(&shot.href),
                index = shot.index,
                label = escape_html(&shot.label),
            ));
        }
        out.push_str("</ul>\n");

        for shot in &case.screenshots {
            out.push_str(&format!(
                "<div class=\"screenshot\">\n<h3>Step {index:02}: {label}</h3>\n<img src=\"{href}\" alt=\"Step {index:02}: {label}\" loading=\"lazy\">\n</div>\n",
                href = escape_html(&shot.href),
                index = shot.index,
                label = escape_html(&shot.label),
            ));
        }
    }

    out.push_str("</div>\n");
    out
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
