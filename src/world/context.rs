use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::browser::page::{Browser, BrowserContext, BrowserLauncher, LaunchOptions, Page};
use crate::error::{BrowserError, E2eError};

/// The live browser session backing one scenario: browser, isolated
/// context and a single page.
///
/// Acquired before the scenario's first step and released after its last,
/// whatever the outcome. Holds nothing between scenarios.
pub struct ExecutionContext {
    options: LaunchOptions,
    screenshots_dir: PathBuf,
    browser: Option<Box<dyn Browser>>,
    context: Option<Box<dyn BrowserContext>>,
    page: Option<Box<dyn Page>>,
}

impl ExecutionContext {
    pub fn new(options: LaunchOptions, screenshots_dir: impl Into<PathBuf>) -> Self {
        Self {
            options,
            screenshots_dir: screenshots_dir.into(),
            browser: None,
            context: None,
            page: None,
        }
    }

    pub fn headless(&self) -> bool {
        self.options.headless
    }

    /// Takes effect at the next `acquire`.
    pub fn set_headless(&mut self, headless: bool) {
        self.options.headless = headless;
    }

    pub fn options(&self) -> &LaunchOptions {
        &self.options
    }

    pub fn screenshots_dir(&self) -> &Path {
        &self.screenshots_dir
    }

    pub fn is_open(&self) -> bool {
        self.page.is_some()
    }

    /// Open browser, context and page with the fixed viewport and timeouts.
    ///
    /// Whatever was opened before a failure is closed again before the
    /// error is returned.
    pub fn acquire(&mut self, launcher: &dyn BrowserLauncher) -> Result<(), E2eError> {
        if self.browser.is_some() {
            return Ok(());
        }

        if let Err(e) = self.open(launcher) {
            if let Err(cleanup) = self.release() {
                warn!(error = %cleanup, "cleanup after failed acquire also failed");
            }
            return Err(e.into());
        }

        debug!(
            headless = self.options.headless,
            width = self.options.viewport.width,
            height = self.options.viewport.height,
            "execution context acquired"
        );
        Ok(())
    }

    fn open(&mut self, launcher: &dyn BrowserLauncher) -> Result<(), BrowserError> {
        let browser = self.browser.insert(launcher.launch(&self.options)?);
        let context = self.context.insert(browser.new_context(self.options.viewport)?);
        let page = self.page.insert(context.new_page()?);
        page.set_default_timeout(self.options.action_timeout_ms)?;
        page.set_default_navigation_timeout(self.options.navigation_timeout_ms)?;
        Ok(())
    }

    /// Close page, then context, then browser.
    ///
    /// Missing resources are skipped. A close failure does not stop the
    /// remaining closes; the first failure is returned.
    pub fn release(&mut self) -> Result<(), BrowserError> {
        let mut first_error = None;

        if let Some(mut page) = self.page.take() {
            if let Err(e) = page.close() {
                first_error.get_or_insert(e);
            }
        }
        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.close() {
                first_error.get_or_insert(e);
            }
        }
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Write a full-page screenshot to `<screenshots_dir>/<label>.png`.
    ///
    /// Returns `Ok(None)` when no page is open.
    pub fn capture(&mut self, label: &str) -> Result<Option<PathBuf>, E2eError> {
        let Some(page) = self.page.as_mut() else {
            return Ok(None);
        };

        let path = self.screenshots_dir.join(format!("{}.png", label));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| E2eError::io(parent, e))?;
        }
        page.screenshot(&path, true)?;
        debug!(path = %path.display(), "screenshot captured");
        Ok(Some(path))
    }

    pub fn page(&mut self) -> Result<&mut dyn Page, E2eError> {
        match self.page.as_mut() {
            Some(page) => Ok(page.as_mut()),
            None => Err(E2eError::NoPage),
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        if self.browser.is_some() || self.context.is_some() || self.page.is_some() {
            if let Err(e) = self.release() {
                warn!(error = %e, "execution context release on drop failed");
            }
        }
    }
}
