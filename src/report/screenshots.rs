use std::io::ErrorKind;
use std::path::Path;

use regex::Regex;

/// One `<test-case>_step_<NN>.png` file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepScreenshot {
    pub index: u32,
    pub file_name: String,
}

/// List a test case's step screenshots in execution order.
///
/// Looks in `<screenshots_dir>/<test_case>/`. Returns `Ok(None)` when that
/// directory does not exist. Files not named `<test_case>_step_<N>.png`
/// (failure screenshots, stray files) are ignored. Ordering is by the
/// numeric index, never by directory listing order.
pub fn discover_step_screenshots(
    screenshots_dir: &Path,
    test_case: &str,
) -> std::io::Result<Option<Vec<StepScreenshot>>> {
    let dir = screenshots_dir.join(test_case);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let pattern = format!(r"^{}_step_(\d+)\.png$", regex::escape(test_case));
    let re = Regex::new(&pattern).map_err(|e| std::io::Error::new(ErrorKind::InvalidInput, e))?;

    let mut shots = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(index) = re
            .captures(&file_name)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        else {
            continue;
        };
        shots.push(StepScreenshot { index, file_name });
    }

    shots.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.file_name.cmp(&b.file_name)));
    Ok(Some(shots))
}
