use careers_e2e::browser::page::{BrowserLauncher, LaunchOptions, Viewport};
use careers_e2e::browser::protocol::{BrowserRequest, BrowserResponse};
use careers_e2e::browser::session::{NodeLauncher, EXIT_GRACE};
use careers_e2e::error::BrowserError;

// ============================================================================
// 1. Wire format
// ============================================================================

#[test]
fn requests_are_tagged_by_command() {
    let json = serde_json::to_value(BrowserRequest::NewContext {
        viewport: Viewport {
            width: 1920,
            height: 1080,
        },
    })
    .unwrap();
    assert_eq!(
        json,
        serde_json::json!({"cmd": "new_context", "viewport": {"width": 1920, "height": 1080}})
    );

    let json = serde_json::to_value(BrowserRequest::WaitForUrl {
        page: 2,
        pattern: "**/search-results**".into(),
        timeout_ms: None,
    })
    .unwrap();
    assert_eq!(
        json,
        serde_json::json!({"cmd": "wait_for_url", "page": 2, "pattern": "**/search-results**"})
    );

    assert_eq!(serde_json::to_string(&BrowserRequest::Quit).unwrap(), r#"{"cmd":"quit"}"#);
}

#[test]
fn command_names_match_wire_tags() {
    let requests = [
        BrowserRequest::Launch { headless: true },
        BrowserRequest::Screenshot {
            page: 1,
            path: "shots/a.png".into(),
            full_page: true,
        },
        BrowserRequest::TextContents {
            page: 1,
            selector: "li".into(),
        },
        BrowserRequest::CloseContext { context: 1 },
    ];
    for request in &requests {
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["cmd"], request.command_name());
    }
}

#[test]
fn responses_fill_missing_fields_with_defaults() {
    let response: BrowserResponse = serde_json::from_str(r#"{"ok":true,"count":4}"#).unwrap();
    assert!(response.ok);
    assert_eq!(response.count, Some(4));
    assert!(response.text.is_none());
    assert!(!response.is_timeout());

    let response: BrowserResponse =
        serde_json::from_str(r#"{"ok":false,"kind":"timeout","error":"Timeout 5000ms exceeded"}"#).unwrap();
    assert!(response.is_timeout());
}

// ============================================================================
// 2. Driver process
// ============================================================================

#[test]
fn missing_runtime_is_a_spawn_error() {
    let launcher = NodeLauncher::new("careers-e2e-no-such-runtime", "node/browser_server.js");
    match launcher.launch(&LaunchOptions::default()) {
        Err(BrowserError::Spawn { script, .. }) => assert_eq!(script, "node/browser_server.js"),
        Err(other) => panic!("expected spawn error, got {}", other),
        Ok(_) => panic!("launch should fail"),
    }
}

/// A shell stand-in for the Node driver speaking the same line protocol.
#[cfg(unix)]
const SCRIPTED_DRIVER: &str = r#"
echo '{"ok":true,"ready":true}'
while read -r line; do
  case "$line" in
    *'"cmd":"new_context"'*) echo '{"ok":true,"id":1}' ;;
    *'"cmd":"new_page"'*) echo '{"ok":true,"id":7}' ;;
    *'"cmd":"title"'*) echo '{"ok":true,"text":"Just Eat Takeaway Careers"}' ;;
    *'"cmd":"count"'*) echo '{"ok":true,"count":3}' ;;
    *'"cmd":"wait_for_selector"'*) echo '{"ok":false,"kind":"timeout","error":"Timeout 10ms exceeded"}' ;;
    *'"cmd":"click"'*) echo '{"ok":false,"error":"element is not visible"}' ;;
    *'"cmd":"quit"'*) echo '{"ok":true}'; exit 0 ;;
    *) echo '{"ok":true}' ;;
  esac
done
"#;

#[cfg(unix)]
#[test]
fn session_round_trips_through_a_scripted_driver() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("driver.sh");
    std::fs::write(&script, SCRIPTED_DRIVER).unwrap();

    let launcher = NodeLauncher::new("sh", &script);
    let mut browser = launcher.launch(&LaunchOptions::default()).unwrap();
    let mut context = browser.new_context(Viewport::default()).unwrap();
    let mut page = context.new_page().unwrap();

    page.set_default_timeout(30_000).unwrap();
    page.goto("https://careers.justeattakeaway.com/global/en/home").unwrap();
    assert_eq!(page.title().unwrap(), "Just Eat Takeaway Careers");
    assert_eq!(page.count("li").unwrap(), 3);

    assert!(matches!(
        page.wait_for_selector("#missing", Some(10)),
        Err(BrowserError::Timeout { ref command, .. }) if command == "wait_for_selector"
    ));
    assert!(matches!(
        page.click("#hidden", None),
        Err(BrowserError::Protocol { ref error, .. }) if error == "element is not visible"
    ));

    page.close().unwrap();
    context.close().unwrap();
    browser.close().unwrap();
    // second close is a no-op
    browser.close().unwrap();
}

// ============================================================================
// 3. Driver failure paths
// ============================================================================

#[cfg(unix)]
fn write_driver(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let script = dir.join("driver.sh");
    std::fs::write(&script, body).unwrap();
    script
}

#[cfg(unix)]
fn pid_alive(pid: &str) -> bool {
    std::process::Command::new("kill")
        .args(["-0", pid])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(unix)]
#[test]
fn rejected_quit_returns_the_error_and_stops_the_driver() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("driver.pid");
    let script = write_driver(
        dir.path(),
        &format!(
            r#"echo $$ > '{}'
echo '{{"ok":true,"ready":true}}'
while read -r line; do
  case "$line" in
    *'"cmd":"quit"'*) echo '{{"ok":false,"error":"browser close failed"}}' ;;
    *) echo '{{"ok":true}}' ;;
  esac
done
"#,
            pid_file.display()
        ),
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let launcher = NodeLauncher::new("sh", &script);
    std::thread::spawn(move || {
        let result = launcher
            .launch(&LaunchOptions::default())
            .and_then(|mut browser| browser.close());
        let _ = tx.send(result);
    });

    let result = rx
        .recv_timeout(EXIT_GRACE)
        .expect("closing the browser should not block on a driver that rejected quit");
    assert!(matches!(
        result,
        Err(BrowserError::Protocol { ref command, ref error }) if command == "quit" && error == "browser close failed"
    ));

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    assert!(!pid_alive(pid.trim()), "driver {} still running", pid.trim());
}

#[cfg(unix)]
#[test]
fn missing_ready_signal_fails_launch_and_stops_the_driver() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("driver.pid");
    let script = write_driver(
        dir.path(),
        &format!(
            "echo $$ > '{}'\necho '{{\"ok\":true}}'\nexec sleep 20\n",
            pid_file.display()
        ),
    );

    let err = NodeLauncher::new("sh", &script)
        .launch(&LaunchOptions::default())
        .err()
        .expect("launch without a ready signal should fail");
    assert!(matches!(err, BrowserError::Protocol { ref error, .. } if error.contains("no ready signal")));

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    assert!(!pid_alive(pid.trim()), "driver {} outlived the failed launch", pid.trim());
}

#[cfg(unix)]
#[test]
fn rejected_launch_stops_the_driver() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("driver.pid");
    let script = write_driver(
        dir.path(),
        &format!(
            r#"echo $$ > '{}'
echo '{{"ok":true,"ready":true}}'
read -r line
echo '{{"ok":false,"error":"chromium not installed"}}'
exec sleep 20
"#,
            pid_file.display()
        ),
    );

    let err = NodeLauncher::new("sh", &script)
        .launch(&LaunchOptions::default())
        .err()
        .expect("rejected launch should fail");
    assert!(matches!(err, BrowserError::Protocol { ref command, .. } if command == "launch"));

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    assert!(!pid_alive(pid.trim()));
}

#[cfg(unix)]
#[test]
fn driver_dying_mid_request_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_driver(
        dir.path(),
        r#"echo '{"ok":true,"ready":true}'
while read -r line; do
  case "$line" in
    *'"cmd":"new_context"'*) echo '{"ok":true,"id":1}' ;;
    *'"cmd":"new_page"'*) exit 3 ;;
    *) echo '{"ok":true}' ;;
  esac
done
"#,
    );

    let launcher = NodeLauncher::new("sh", &script);
    let mut browser = launcher.launch(&LaunchOptions::default()).unwrap();
    let mut context = browser.new_context(Viewport::default()).unwrap();

    match context.new_page() {
        Err(BrowserError::Io(message)) => assert!(message.contains("empty response"), "{}", message),
        Err(other) => panic!("expected I/O error, got {}", other),
        Ok(_) => panic!("new_page should fail once the driver is gone"),
    }
    assert!(browser.close().is_err());
}
