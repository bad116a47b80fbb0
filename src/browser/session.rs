//! Browser automation over a long-lived Node.js driver process.
//!
//! The driver keeps one Chromium instance open and answers one JSON line per
//! request on stdout. The first line it prints must be
//! `{"ok":true,"ready":true}`. Contexts and pages are addressed by the numeric
//! `id` the driver returns from `new_context` / `new_page`. A failed wait is
//! reported as `{"ok":false,"kind":"timeout","error":"..."}`.
//!
//! The driver process never outlives its channel: a rejected `quit`, a
//! driver that stays up past [`EXIT_GRACE`] after `quit`, and a failed
//! launch all end with the process killed and reaped.

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::browser::page::{Browser, BrowserContext, BrowserLauncher, LaunchOptions, Page, Viewport};
use crate::browser::protocol::{BrowserRequest, BrowserResponse};
use crate::error::BrowserError;

/// How long a driver may take to exit after acknowledging `quit`.
pub const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Spawns `<node> <driver_script>` for every launch.
#[derive(Debug, Clone)]
pub struct NodeLauncher {
    pub node: String,
    pub driver_script: PathBuf,
}

impl NodeLauncher {
    pub fn new(node: impl Into<String>, driver_script: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            driver_script: driver_script.into(),
        }
    }
}

impl BrowserLauncher for NodeLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Browser>, BrowserError> {
        let channel = NodeChannel::spawn(&self.node, &self.driver_script)?;
        let channel = Rc::new(RefCell::new(channel));
        channel.borrow_mut().send_ok(&BrowserRequest::Launch {
            headless: options.headless,
        })?;
        debug!(headless = options.headless, "browser launched");
        Ok(Box::new(NodeBrowser {
            channel,
            closed: false,
        }))
    }
}

// ============================================================================
// NDJSON channel
// ============================================================================

struct NodeChannel {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    script: String,
}

impl NodeChannel {
    fn spawn(node: &str, script: &Path) -> Result<Self, BrowserError> {
        let script_name = script.display().to_string();
        let mut child = Command::new(node)
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BrowserError::Spawn {
                script: script_name.clone(),
                source: e,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            terminate(&mut child, &script_name);
            return Err(BrowserError::Io(format!("failed to capture stdio of {}", script_name)));
        };

        // Drain stderr so the driver never blocks on a full pipe.
        if let Some(stderr) = child.stderr.take() {
            std::thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    debug!(target: "careers_e2e::driver", "{}", line.trim_end());
                }
            });
        }

        let mut channel = NodeChannel {
            child,
            stdin,
            reader: BufReader::new(stdout),
            script: script_name,
        };

        let ready = channel.read_response("ready signal")?;
        if !ready.ok || ready.ready != Some(true) {
            return Err(BrowserError::Protocol {
                command: "launch".into(),
                error: format!("no ready signal from {}", channel.script),
            });
        }
        Ok(channel)
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse, BrowserError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| BrowserError::Io(format!("failed to read {}: {}", context, e)))?;

        if line.trim().is_empty() {
            return Err(BrowserError::Io(format!(
                "empty response from {} (process may have died)",
                self.script
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| BrowserError::JsonParse {
            context: format!("{} {}", self.script, context),
            source: e,
        })
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        let json = serde_json::to_string(request).map_err(|e| BrowserError::JsonSerialize {
            context: request.command_name().into(),
            source: e,
        })?;
        debug!(target: "careers_e2e::protocol", "-> {}", json);

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| BrowserError::Io(format!("failed to write to {}: {}", self.script, e)))?;

        self.read_response(request.command_name())
    }

    /// Send a request and turn `ok: false` into an error.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        let response = self.send(request)?;
        if response.ok {
            return Ok(response);
        }
        let command = request.command_name().to_string();
        let error = response.error.clone().unwrap_or_else(|| "unknown error".into());
        if response.is_timeout() {
            Err(BrowserError::Timeout { command, error })
        } else {
            Err(BrowserError::Protocol { command, error })
        }
    }

    /// Ask the driver to exit. A rejected `quit` kills the process at once;
    /// an acknowledged one gets [`EXIT_GRACE`] before being killed.
    fn quit(&mut self) -> Result<(), BrowserError> {
        let result = self.send_ok(&BrowserRequest::Quit).map(|_| ());
        match result {
            Ok(()) => self.wait_or_kill(EXIT_GRACE),
            Err(ref e) => {
                warn!(script = %self.script, error = %e, "driver rejected quit; killing it");
                terminate(&mut self.child, &self.script);
            }
        }
        result
    }

    fn wait_or_kill(&mut self, grace: Duration) {
        let deadline = Instant::now() + grace;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) if Instant::now() < deadline => std::thread::sleep(Duration::from_millis(20)),
                Ok(None) => {
                    warn!(script = %self.script, "driver still running after quit; killing it");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "driver process did not exit cleanly");
                    break;
                }
            }
        }
        terminate(&mut self.child, &self.script);
    }
}

impl Drop for NodeChannel {
    fn drop(&mut self) {
        terminate(&mut self.child, &self.script);
    }
}

/// Kill and reap `child` unless it has already exited.
fn terminate(child: &mut Child, script: &str) {
    if matches!(child.try_wait(), Ok(Some(_))) {
        return;
    }
    if let Err(e) = child.kill() {
        debug!(script, error = %e, "kill failed");
    }
    if let Err(e) = child.wait() {
        warn!(script, error = %e, "driver process could not be reaped");
    }
}

type SharedChannel = Rc<RefCell<NodeChannel>>;

fn require_id(response: BrowserResponse, command: &str) -> Result<u32, BrowserError> {
    response.id.ok_or_else(|| BrowserError::Protocol {
        command: command.into(),
        error: "response carried no id".into(),
    })
}

// ============================================================================
// Handles
// ============================================================================

struct NodeBrowser {
    channel: SharedChannel,
    closed: bool,
}

impl Browser for NodeBrowser {
    fn new_context(&mut self, viewport: Viewport) -> Result<Box<dyn BrowserContext>, BrowserError> {
        let response = self
            .channel
            .borrow_mut()
            .send_ok(&BrowserRequest::NewContext { viewport })?;
        let id = require_id(response, "new_context")?;
        Ok(Box::new(NodeContext {
            channel: Rc::clone(&self.channel),
            id,
        }))
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.channel.borrow_mut().quit()
    }
}

impl Drop for NodeBrowser {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.close();
        }
    }
}

struct NodeContext {
    channel: SharedChannel,
    id: u32,
}

impl BrowserContext for NodeContext {
    fn new_page(&mut self) -> Result<Box<dyn Page>, BrowserError> {
        let response = self
            .channel
            .borrow_mut()
            .send_ok(&BrowserRequest::NewPage { context: self.id })?;
        let id = require_id(response, "new_page")?;
        Ok(Box::new(NodePage {
            channel: Rc::clone(&self.channel),
            id,
        }))
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        self.channel
            .borrow_mut()
            .send_ok(&BrowserRequest::CloseContext { context: self.id })?;
        Ok(())
    }
}

struct NodePage {
    channel: SharedChannel,
    id: u32,
}

impl NodePage {
    fn send_ok(&self, request: BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        self.channel.borrow_mut().send_ok(&request)
    }
}

impl Page for NodePage {
    fn set_default_timeout(&mut self, timeout_ms: u64) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::SetTimeouts {
            page: self.id,
            action_ms: Some(timeout_ms),
            navigation_ms: None,
        })?;
        Ok(())
    }

    fn set_default_navigation_timeout(&mut self, timeout_ms: u64) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::SetTimeouts {
            page: self.id,
            action_ms: None,
            navigation_ms: Some(timeout_ms),
        })?;
        Ok(())
    }

    fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Goto {
            page: self.id,
            url: url.to_string(),
        })?;
        Ok(())
    }

    fn title(&mut self) -> Result<String, BrowserError> {
        let response = self.send_ok(BrowserRequest::Title { page: self.id })?;
        Ok(response.text.unwrap_or_default())
    }

    fn url(&mut self) -> Result<String, BrowserError> {
        let response = self.send_ok(BrowserRequest::Url { page: self.id })?;
        response.text.ok_or_else(|| BrowserError::Protocol {
            command: "url".into(),
            error: "no URL in response".into(),
        })
    }

    fn wait_for_selector(&mut self, selector: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::WaitForSelector {
            page: self.id,
            selector: selector.to_string(),
            timeout_ms,
        })?;
        Ok(())
    }

    fn wait_for_url(&mut self, pattern: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::WaitForUrl {
            page: self.id,
            pattern: pattern.to_string(),
            timeout_ms,
        })?;
        Ok(())
    }

    fn wait_for_timeout(&mut self, duration_ms: u64) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Wait {
            page: self.id,
            duration_ms,
        })?;
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Fill {
            page: self.id,
            selector: selector.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    fn click(&mut self, selector: &str, timeout_ms: Option<u64>) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Click {
            page: self.id,
            selector: selector.to_string(),
            timeout_ms,
        })?;
        Ok(())
    }

    fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        let response = self.send_ok(BrowserRequest::Count {
            page: self.id,
            selector: selector.to_string(),
        })?;
        Ok(response.count.unwrap_or(0))
    }

    fn text_content(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::TextContent {
            page: self.id,
            selector: selector.to_string(),
        })?;
        Ok(response.text)
    }

    fn all_text_contents(&mut self, selector: &str) -> Result<Vec<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::TextContents {
            page: self.id,
            selector: selector.to_string(),
        })?;
        Ok(response.texts.unwrap_or_default())
    }

    fn get_attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::Attribute {
            page: self.id,
            selector: selector.to_string(),
            name: name.to_string(),
        })?;
        Ok(response.text)
    }

    fn is_checked(&mut self, selector: &str) -> Result<bool, BrowserError> {
        let response = self.send_ok(BrowserRequest::Checked {
            page: self.id,
            selector: selector.to_string(),
        })?;
        Ok(response.checked.unwrap_or(false))
    }

    fn screenshot(&mut self, path: &Path, full_page: bool) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Screenshot {
            page: self.id,
            path: path.display().to_string(),
            full_page,
        })?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::ClosePage { page: self.id })?;
        Ok(())
    }
}
