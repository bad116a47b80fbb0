use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;

/// Default bound for element actions and navigations.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Fixed settings applied when an execution context is acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub viewport: Viewport,
    pub action_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            action_timeout_ms: DEFAULT_TIMEOUT_MS,
            navigation_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// Automation surface
// ============================================================================

/// Starts a browser process.
pub trait BrowserLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Browser>, BrowserError>;
}

/// A running browser. Owns zero or more isolated contexts.
pub trait Browser {
    fn new_context(&mut self, viewport: Viewport) -> Result<Box<dyn BrowserContext>, BrowserError>;
    fn close(&mut self) -> Result<(), BrowserError>;
}

/// An isolated browsing context (cookies, storage) inside a browser.
pub trait BrowserContext {
    fn new_page(&mut self) -> Result<Box<dyn Page>, BrowserError>;
    fn close(&mut self) -> Result<(), BrowserError>;
}

/// A single tab. Selectors are passed through to the driver untouched,
/// so CSS, `text=` and `:has()` forms are all accepted.
///
/// Every wait honours either the explicit `timeout_ms` or the page's
/// default timeout; there are no retries.
pub trait Page {
    fn set_default_timeout(&mut self, timeout_ms: u64) -> Result<(), BrowserError>;
    fn set_default_navigation_timeout(&mut self, timeout_ms: u64) -> Result<(), BrowserError>;

    /// Navigate and wait for `domcontentloaded`.
    fn goto(&mut self, url: &str) -> Result<(), BrowserError>;
    fn title(&mut self) -> Result<String, BrowserError>;
    fn url(&mut self) -> Result<String, BrowserError>;

    fn wait_for_selector(&mut self, selector: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError>;
    /// Wait until the URL matches a glob such as `**/search-results**`.
    fn wait_for_url(&mut self, pattern: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError>;
    fn wait_for_timeout(&mut self, duration_ms: u64) -> Result<(), BrowserError>;

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;
    fn click(&mut self, selector: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError>;

    fn count(&mut self, selector: &str) -> Result<usize, BrowserError>;
    /// Text of the first match, `None` when nothing matches.
    fn text_content(&mut self, selector: &str) -> Result<Option<String>, BrowserError>;
    fn all_text_contents(&mut self, selector: &str) -> Result<Vec<String>, BrowserError>;
    fn get_attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>, BrowserError>;
    fn is_checked(&mut self, selector: &str) -> Result<bool, BrowserError>;

    fn screenshot(&mut self, path: &Path, full_page: bool) -> Result<(), BrowserError>;
    fn close(&mut self) -> Result<(), BrowserError>;
}
