pub mod console;
pub mod html;
pub mod labels;
pub mod report_model;
pub mod screenshots;

pub use console::format_console_summary;
pub use html::generate_html_report;
pub use labels::StepLabels;
pub use report_model::{build_report, ReportDocument, ReportOptions};
pub use screenshots::discover_step_screenshots;
