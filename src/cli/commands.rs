use std::path::Path;

use tracing::{info, warn};

use crate::browser::page::BrowserLauncher;
use crate::browser::session::NodeLauncher;
use crate::cli::config::{build_run_settings, AppConfig, RunSettings, WorldParameters};
use crate::error::E2eError;
use crate::gherkin::parser::load_features;
use crate::report::console::format_console_summary;
use crate::report::html::generate_html_report;
use crate::report::labels::StepLabels;
use crate::report::report_model::{build_report, ReportOptions};
use crate::runner::result::{read_results, write_results};
use crate::runner::scenario::{RunOptions, ScenarioRunner};
use crate::steps::default_registry;

// ============================================================================
// run subcommand
// ============================================================================

pub struct RunArgs<'a> {
    pub features: Option<&'a str>,
    pub results: Option<&'a str>,
    pub screenshots: Option<&'a str>,
    pub headed: bool,
    pub parameters: Option<&'a str>,
    pub tags: Option<&'a str>,
}

/// Run feature files, write the results JSON and print a summary.
/// Returns whether every scenario passed.
pub fn cmd_run(config: &AppConfig, args: &RunArgs<'_>) -> Result<bool, E2eError> {
    let parameters = args
        .parameters
        .map(WorldParameters::parse)
        .transpose()
        .map_err(|e| E2eError::Json {
            context: "world parameters".to_string(),
            source: e,
        })?;

    let settings = build_run_settings(
        config,
        args.features,
        args.results,
        args.screenshots,
        args.headed,
        parameters.as_ref(),
        args.tags,
    );
    let launcher = NodeLauncher::new(&config.browser.node, &config.browser.driver_script);
    run_with(&settings, &launcher)
}

/// Execute a resolved run against any launcher.
pub fn run_with(
    settings: &RunSettings,
    launcher: &dyn BrowserLauncher,
) -> Result<bool, E2eError> {
    let features = load_features(&settings.features)?;
    let scenario_count: usize = features.iter().map(|f| f.scenarios.len()).sum();
    if scenario_count == 0 {
        warn!(path = %settings.features.display(), "no scenarios found");
    }

    let registry = default_registry()?;
    info!(
        features = features.len(),
        scenarios = scenario_count,
        bindings = registry.len(),
        headless = settings.launch.headless,
        "starting run"
    );

    let runner = ScenarioRunner::new(
        &registry,
        launcher,
        RunOptions {
            launch: settings.launch.clone(),
            screenshots_dir: settings.screenshots.clone(),
            tag: settings.tag.clone(),
        },
    );
    let results = runner.run_features(&features);

    write_results(&settings.results, &results)?;
    info!(path = %settings.results.display(), "results written");

    print!("{}", format_console_summary(&results));

    Ok(results.iter().all(|r| r.passed()))
}

// ============================================================================
// report subcommand
// ============================================================================

pub struct ReportArgs<'a> {
    pub results: Option<&'a str>,
    pub screenshots: Option<&'a str>,
    pub output: Option<&'a str>,
    pub title: Option<&'a str>,
    pub strict: bool,
    pub timestamp: bool,
}

/// Build the HTML report from a results JSON and the screenshot tree.
pub fn cmd_report(config: &AppConfig, args: &ReportArgs<'_>) -> Result<(), E2eError> {
    let results_path = Path::new(args.results.unwrap_or(&config.run.results));
    let screenshots = Path::new(args.screenshots.unwrap_or(&config.run.screenshots));
    let output = Path::new(args.output.unwrap_or(&config.report.output));

    let results = read_results(results_path)?;

    let mut labels = StepLabels::builtin();
    labels.extend(&config.report.step_labels);

    let options = ReportOptions {
        title: args.title.unwrap_or(&config.report.title).to_string(),
        screenshots_href: config.report.screenshots_href.clone(),
        generated_at: args
            .timestamp
            .then(|| chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        strict: args.strict || config.report.strict,
        environment: config.browser.report_environment(),
    };

    let document = build_report(&results, screenshots, &labels, &options)?;
    let html = generate_html_report(&document);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| E2eError::io(parent, e))?;
        }
    }
    std::fs::write(output, html).map_err(|e| E2eError::io(output, e))?;

    info!(
        path = %output.display(),
        cases = document.summary.total,
        passed = document.summary.passed,
        failed = document.summary.failed,
        "report written"
    );
    println!("Report written to {}", output.display());
    Ok(())
}
