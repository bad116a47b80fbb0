use tracing::debug;

use crate::browser::page::Page;
use crate::error::BrowserError;

/// One named way of finding an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorStrategy {
    pub name: String,
    pub selector: String,
    /// Bound for waiting on this strategy; `None` uses the page default.
    pub timeout_ms: Option<u64>,
}

impl LocatorStrategy {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Ordered fallbacks: the first strategy that can be waited on and clicked wins.
#[derive(Debug, Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<LocatorStrategy>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, strategy: LocatorStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategies(&self) -> &[LocatorStrategy] {
        &self.strategies
    }

    /// Click the first strategy that resolves.
    ///
    /// On total failure the error names every attempted strategy with the
    /// reason it failed, in the order tried.
    pub fn click_first(&self, page: &mut dyn Page) -> Result<&LocatorStrategy, BrowserError> {
        let mut attempted = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let outcome = page
                .wait_for_selector(&strategy.selector, strategy.timeout_ms)
                .and_then(|_| page.click(&strategy.selector, strategy.timeout_ms));

            match outcome {
                Ok(()) => {
                    debug!(strategy = %strategy.name, selector = %strategy.selector, "locator matched");
                    return Ok(strategy);
                }
                Err(e) => {
                    debug!(strategy = %strategy.name, error = %e, "locator strategy failed");
                    attempted.push(format!("{} `{}`: {}", strategy.name, strategy.selector, e));
                }
            }
        }

        Err(BrowserError::NoLocatorMatched { attempted })
    }
}
