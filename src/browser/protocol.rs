use serde::{Deserialize, Serialize};

use crate::browser::page::Viewport;

/// Request sent to the driver script over stdin (one JSON line).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Launch {
        headless: bool,
    },
    NewContext {
        viewport: Viewport,
    },
    NewPage {
        context: u32,
    },
    SetTimeouts {
        page: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        action_ms: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        navigation_ms: Option<u64>,
    },
    Goto {
        page: u32,
        url: String,
    },
    Title {
        page: u32,
    },
    Url {
        page: u32,
    },
    WaitForSelector {
        page: u32,
        selector: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    WaitForUrl {
        page: u32,
        pattern: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    Wait {
        page: u32,
        duration_ms: u64,
    },
    Fill {
        page: u32,
        selector: String,
        value: String,
    },
    Click {
        page: u32,
        selector: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    Count {
        page: u32,
        selector: String,
    },
    TextContent {
        page: u32,
        selector: String,
    },
    TextContents {
        page: u32,
        selector: String,
    },
    Attribute {
        page: u32,
        selector: String,
        name: String,
    },
    Checked {
        page: u32,
        selector: String,
    },
    Screenshot {
        page: u32,
        path: String,
        full_page: bool,
    },
    ClosePage {
        page: u32,
    },
    CloseContext {
        context: u32,
    },
    Quit,
}

impl BrowserRequest {
    /// Name used in error messages and logs.
    pub fn command_name(&self) -> &'static str {
        match self {
            BrowserRequest::Launch { .. } => "launch",
            BrowserRequest::NewContext { .. } => "new_context",
            BrowserRequest::NewPage { .. } => "new_page",
            BrowserRequest::SetTimeouts { .. } => "set_timeouts",
            BrowserRequest::Goto { .. } => "goto",
            BrowserRequest::Title { .. } => "title",
            BrowserRequest::Url { .. } => "url",
            BrowserRequest::WaitForSelector { .. } => "wait_for_selector",
            BrowserRequest::WaitForUrl { .. } => "wait_for_url",
            BrowserRequest::Wait { .. } => "wait",
            BrowserRequest::Fill { .. } => "fill",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::Count { .. } => "count",
            BrowserRequest::TextContent { .. } => "text_content",
            BrowserRequest::TextContents { .. } => "text_contents",
            BrowserRequest::Attribute { .. } => "attribute",
            BrowserRequest::Checked { .. } => "checked",
            BrowserRequest::Screenshot { .. } => "screenshot",
            BrowserRequest::ClosePage { .. } => "close_page",
            BrowserRequest::CloseContext { .. } => "close_context",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from the driver script over stdout (one JSON line).
#[derive(Debug, Default, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Failure class reported by the driver, e.g. `"timeout"`.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    /// Id of a newly created context or page.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub checked: Option<bool>,
}

impl BrowserResponse {
    pub fn is_timeout(&self) -> bool {
        self.kind.as_deref() == Some("timeout")
    }
}
