use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::browser::page::{LaunchOptions, Viewport, DEFAULT_TIMEOUT_MS};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "careers-e2e",
    version,
    about = "Behavior-driven browser tests for the careers site"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: careers-e2e.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run feature files and write the results JSON
    Run {
        /// Feature file or directory of .feature files
        #[arg(long)]
        features: Option<String>,

        /// Where to write the results JSON
        #[arg(long)]
        results: Option<String>,

        /// Screenshot root directory
        #[arg(long)]
        screenshots: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// World parameters as JSON, e.g. '{"headless": false}'
        #[arg(long)]
        parameters: Option<String>,

        /// Only run scenarios with this tag
        #[arg(long)]
        tags: Option<String>,
    },

    /// Render the results JSON and screenshots into an HTML report
    Report {
        /// Results JSON produced by `run`
        #[arg(long)]
        results: Option<String>,

        /// Screenshot root directory
        #[arg(long)]
        screenshots: Option<String>,

        /// HTML output path
        #[arg(short, long)]
        output: Option<String>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Fail on missing screenshot directories or unlabeled steps
        #[arg(long)]
        strict: bool,

        /// Embed the generation time in the report header
        #[arg(long)]
        timestamp: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `careers-e2e.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_timeout")]
    pub action_timeout_ms: u64,

    #[serde(default = "default_timeout")]
    pub navigation_timeout_ms: u64,

    #[serde(default = "default_node")]
    pub node: String,

    #[serde(default = "default_driver_script")]
    pub driver_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            action_timeout_ms: DEFAULT_TIMEOUT_MS,
            navigation_timeout_ms: DEFAULT_TIMEOUT_MS,
            node: default_node(),
            driver_script: default_driver_script(),
        }
    }
}

impl BrowserConfig {
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            headless: self.headless,
            viewport: Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            },
            action_timeout_ms: self.action_timeout_ms,
            navigation_timeout_ms: self.navigation_timeout_ms,
        }
    }

    /// Rows for the report's environment panel.
    pub fn report_environment(&self) -> Vec<(String, String)> {
        let mode = if self.headless { "headless" } else { "headed" };
        vec![
            ("Browser".to_string(), "Chromium".to_string()),
            ("Mode".to_string(), mode.to_string()),
            (
                "Viewport".to_string(),
                format!("{}x{}", self.viewport_width, self.viewport_height),
            ),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_features")]
    pub features: String,

    #[serde(default = "default_results")]
    pub results: String,

    #[serde(default = "default_screenshots")]
    pub screenshots: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            features: default_features(),
            results: default_results(),
            screenshots: default_screenshots(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_output")]
    pub output: String,

    #[serde(default = "default_report_title")]
    pub title: String,

    #[serde(default = "default_screenshots_href")]
    pub screenshots_href: String,

    #[serde(default)]
    pub strict: bool,

    /// Extra step descriptions: test case -> step index -> label
    #[serde(default)]
    pub step_labels: BTreeMap<String, BTreeMap<u32, String>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_report_output(),
            title: default_report_title(),
            screenshots_href: default_screenshots_href(),
            strict: false,
            step_labels: BTreeMap::new(),
        }
    }
}

// Serde default helpers
fn default_true() -> bool { true }
fn default_viewport_width() -> u32 { 1920 }
fn default_viewport_height() -> u32 { 1080 }
fn default_timeout() -> u64 { DEFAULT_TIMEOUT_MS }
fn default_node() -> String { "node".to_string() }
fn default_driver_script() -> String { "node/browser_server.js".to_string() }
fn default_features() -> String { "features".to_string() }
fn default_results() -> String { "reports/results.json".to_string() }
fn default_screenshots() -> String { "screenshots".to_string() }
fn default_report_output() -> String { "reports/report.html".to_string() }
fn default_report_title() -> String { "Careers E2E Report".to_string() }
fn default_screenshots_href() -> String { "../screenshots".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing
/// or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("careers-e2e.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// World parameters
// ============================================================================

/// JSON parameters passed with `--parameters`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldParameters {
    #[serde(default)]
    pub headless: Option<bool>,
}

impl WorldParameters {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Headless unless `--headed` is given or the parameters say
/// `"headless": false`; otherwise the config file decides.
pub fn resolve_headless(headed: bool, parameters: Option<&WorldParameters>, config: &BrowserConfig) -> bool {
    if headed {
        return false;
    }
    match parameters.and_then(|p| p.headless) {
        Some(false) => false,
        Some(true) => true,
        None => config.headless,
    }
}

// ============================================================================
// Resolved run settings (CLI > parameters > config file > defaults)
// ============================================================================

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub features: PathBuf,
    pub results: PathBuf,
    pub screenshots: PathBuf,
    pub launch: LaunchOptions,
    pub tag: Option<String>,
}

pub fn build_run_settings(
    config: &AppConfig,
    features: Option<&str>,
    results: Option<&str>,
    screenshots: Option<&str>,
    headed: bool,
    parameters: Option<&WorldParameters>,
    tag: Option<&str>,
) -> RunSettings {
    let mut launch = config.browser.launch_options();
    launch.headless = resolve_headless(headed, parameters, &config.browser);

    RunSettings {
        features: PathBuf::from(features.unwrap_or(&config.run.features)),
        results: PathBuf::from(results.unwrap_or(&config.run.results)),
        screenshots: PathBuf::from(screenshots.unwrap_or(&config.run.screenshots)),
        launch,
        tag: tag.map(|t| t.trim_start_matches('@').to_string()),
    }
}
