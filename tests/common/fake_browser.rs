//! Scripted in-memory browser used in place of the Node driver.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use careers_e2e::browser::page::{Browser, BrowserContext, BrowserLauncher, LaunchOptions, Page, Viewport};
use careers_e2e::error::BrowserError;

pub type ClickEffect = Rc<dyn Fn(&mut FakeState)>;

/// Everything the fake pages read from, plus a journal of every call.
#[derive(Default)]
pub struct FakeState {
    pub journal: Vec<String>,
    pub title: String,
    pub url: String,
    pub counts: HashMap<String, usize>,
    pub texts: HashMap<String, Vec<String>>,
    pub attributes: HashMap<(String, String), String>,
    pub checked: HashSet<String>,
    /// Selectors that never appear: waits and clicks on them time out
    pub missing: HashSet<String>,
    pub on_click: HashMap<String, ClickEffect>,
    /// Page state applied when navigating to a URL
    pub on_goto: HashMap<String, ClickEffect>,
    pub fail_launch: bool,
    pub fail_new_page: bool,
    pub fail_screenshot: bool,
    pub fail_close_page: bool,
    pub fail_close_browser: bool,
    pub launched_with: Option<LaunchOptions>,
    pub open_pages: usize,
    pub open_contexts: usize,
    pub open_browsers: usize,
}

impl FakeState {
    pub fn calls(&self, prefix: &str) -> Vec<&str> {
        self.journal
            .iter()
            .filter(|e| e.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    fn timeout(&self, command: &str, selector: &str) -> BrowserError {
        BrowserError::Timeout {
            command: command.to_string(),
            error: format!("waiting for {}", selector),
        }
    }
}

pub type Shared = Rc<RefCell<FakeState>>;

#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub state: Shared,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(configure: impl FnOnce(&mut FakeState)) -> Self {
        let launcher = Self::new();
        configure(&mut launcher.state.borrow_mut());
        launcher
    }

    pub fn journal(&self) -> Vec<String> {
        self.state.borrow().journal.clone()
    }
}

impl BrowserLauncher for FakeLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Browser>, BrowserError> {
        let mut state = self.state.borrow_mut();
        state.journal.push(format!("launch headless={}", options.headless));
        if state.fail_launch {
            return Err(BrowserError::Protocol {
                command: "launch".into(),
                error: "browser executable not found".into(),
            });
        }
        state.launched_with = Some(options.clone());
        state.open_browsers += 1;
        Ok(Box::new(FakeBrowser {
            state: self.state.clone(),
        }))
    }
}

pub struct FakeBrowser {
    state: Shared,
}

impl Browser for FakeBrowser {
    fn new_context(&mut self, viewport: Viewport) -> Result<Box<dyn BrowserContext>, BrowserError> {
        let mut state = self.state.borrow_mut();
        state
            .journal
            .push(format!("new_context {}x{}", viewport.width, viewport.height));
        state.open_contexts += 1;
        Ok(Box::new(FakeContext {
            state: self.state.clone(),
        }))
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        let mut state = self.state.borrow_mut();
        state.journal.push("close browser".into());
        state.open_browsers -= 1;
        if state.fail_close_browser {
            return Err(BrowserError::Io("browser process already gone".into()));
        }
        Ok(())
    }
}

pub struct FakeContext {
    state: Shared,
}

impl BrowserContext for FakeContext {
    fn new_page(&mut self) -> Result<Box<dyn Page>, BrowserError> {
        let mut state = self.state.borrow_mut();
        state.journal.push("new_page".into());
        if state.fail_new_page {
            return Err(BrowserError::Protocol {
                command: "new_page".into(),
                error: "target closed".into(),
            });
        }
        state.open_pages += 1;
        Ok(Box::new(FakePage {
            state: self.state.clone(),
        }))
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        let mut state = self.state.borrow_mut();
        state.journal.push("close context".into());
        state.open_contexts -= 1;
        Ok(())
    }
}

pub struct FakePage {
    state: Shared,
}

impl FakePage {
    fn record(&self, entry: String) {
        self.state.borrow_mut().journal.push(entry);
    }

    fn check_present(&self, command: &str, selector: &str) -> Result<(), BrowserError> {
        let state = self.state.borrow();
        if state.missing.contains(selector) {
            return Err(state.timeout(command, selector));
        }
        Ok(())
    }

    fn apply(&self, effect: Option<ClickEffect>) {
        if let Some(effect) = effect {
            effect(&mut self.state.borrow_mut());
        }
    }
}

impl Page for FakePage {
    fn set_default_timeout(&mut self, timeout_ms: u64) -> Result<(), BrowserError> {
        self.record(format!("set_default_timeout {}", timeout_ms));
        Ok(())
    }

    fn set_default_navigation_timeout(&mut self, timeout_ms: u64) -> Result<(), BrowserError> {
        self.record(format!("set_default_navigation_timeout {}", timeout_ms));
        Ok(())
    }

    fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.record(format!("goto {}", url));
        let effect = {
            let mut state = self.state.borrow_mut();
            state.url = url.to_string();
            state.on_goto.get(url).cloned()
        };
        self.apply(effect);
        Ok(())
    }

    fn title(&mut self) -> Result<String, BrowserError> {
        Ok(self.state.borrow().title.clone())
    }

    fn url(&mut self) -> Result<String, BrowserError> {
        Ok(self.state.borrow().url.clone())
    }

    fn wait_for_selector(&mut self, selector: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError> {
        self.record(format!("wait_for_selector {} {:?}", selector, timeout_ms));
        self.check_present("wait_for_selector", selector)
    }

    fn wait_for_url(&mut self, pattern: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError> {
        self.record(format!("wait_for_url {} {:?}", pattern, timeout_ms));
        let state = self.state.borrow();
        if glob_matches(pattern, &state.url) {
            Ok(())
        } else {
            Err(state.timeout("wait_for_url", pattern))
        }
    }

    fn wait_for_timeout(&mut self, duration_ms: u64) -> Result<(), BrowserError> {
        self.record(format!("wait {}", duration_ms));
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.record(format!("fill {} = {:?}", selector, value));
        self.check_present("fill", selector)
    }

    fn click(&mut self, selector: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError> {
        self.record(format!("click {} {:?}", selector, timeout_ms));
        self.check_present("click", selector)?;
        let effect = self.state.borrow().on_click.get(selector).cloned();
        self.apply(effect);
        Ok(())
    }

    fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        Ok(self.state.borrow().counts.get(selector).copied().unwrap_or(0))
    }

    fn text_content(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        Ok(self
            .state
            .borrow()
            .texts
            .get(selector)
            .and_then(|t| t.first().cloned()))
    }

    fn all_text_contents(&mut self, selector: &str) -> Result<Vec<String>, BrowserError> {
        Ok(self.state.borrow().texts.get(selector).cloned().unwrap_or_default())
    }

    fn get_attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(self
            .state
            .borrow()
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    fn is_checked(&mut self, selector: &str) -> Result<bool, BrowserError> {
        Ok(self.state.borrow().checked.contains(selector))
    }

    fn screenshot(&mut self, path: &Path, full_page: bool) -> Result<(), BrowserError> {
        self.record(format!("screenshot {} full_page={}", path.display(), full_page));
        if self.state.borrow().fail_screenshot {
            return Err(BrowserError::Protocol {
                command: "screenshot".into(),
                error: "page crashed".into(),
            });
        }
        std::fs::write(path, b"\x89PNG\r\n\x1a\n").map_err(|e| BrowserError::Io(e.to_string()))
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        let mut state = self.state.borrow_mut();
        state.journal.push("close page".into());
        state.open_pages -= 1;
        if state.fail_close_page {
            return Err(BrowserError::Protocol {
                command: "close_page".into(),
                error: "page already closed".into(),
            });
        }
        Ok(())
    }
}

/// `*` and `**` match any run of characters; everything else is literal.
pub fn glob_matches(pattern: &str, url: &str) -> bool {
    let mut rest = url;
    let parts: Vec<&str> = pattern.split('*').collect();
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(tail) => rest = tail,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

pub fn effect(f: impl Fn(&mut FakeState) + 'static) -> ClickEffect {
    Rc::new(f)
}
