// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

/// Random prefix for this test run to avoid conflicts with parallel test runs.
static TEST_PREFIX: LazyLock<String> = LazyLock::new(|| {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    format!("t{:04x}", nanos & 0xFFFF)
});

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_name(suffix: &str) -> String {
    let id = SESSION_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", *TEST_PREFIX, suffix, id)
}

fn tmux_available() -> bool {
    std::process::Command::new("tmux")
        .arg("-V")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

macro_rules! fail_if_no_tmux {
    () => {
        if !tmux_available() {
            panic!("tmux is required but not available");
        }
    };
}

// All tmux tests are serialized because some tests modify PATH which affects all others.

#[tokio::test]
#[serial(tmux)]
async fn create_starts_session() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("create");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60", &[], 80, 24)
        .await
        .unwrap();

    assert!(adapter.exists(&name).await.unwrap());

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn create_passes_environment() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("env");
    let env = vec![("TEST_VAR".to_string(), "test_value".to_string())];

    adapter
        .create(
            &name,
            Path::new("/tmp"),
            "echo $TEST_VAR && sleep 60",
            &env,
            80,
            24,
        )
        .await
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let output = adapter.capture(&name, Some(10)).await.unwrap();
    assert!(output.contains("test_value"));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn create_rejects_duplicate_name() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("dup");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60", &[], 80, 24)
        .await
        .unwrap();

    let result = adapter
        .create(&name, Path::new("/tmp"), "sleep 60", &[], 80, 24)
        .await;
    assert!(matches!(result, Err(SessionError::AlreadyExists(_))));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn send_text_delivers_literal_keys() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("send");

    adapter
        .create(&name, Path::new("/tmp"), "cat", &[], 80, 24)
        .await
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    adapter.send_text(&name, "hello").await.unwrap();
    adapter.send_control(&name, ControlKey::Enter).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let output = adapter.capture(&name, Some(10)).await.unwrap();
    assert!(output.contains("hello"));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn send_text_to_nonexistent_session_returns_not_found() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();

    let result = adapter.send_text("nonexistent-session-xyz", "test").await;
    assert!(matches!(result, Err(SessionError::NotFound(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn kill_terminates_session() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("kill");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60", &[], 80, 24)
        .await
        .unwrap();

    assert!(adapter.exists(&name).await.unwrap());

    adapter.kill(&name).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    assert!(!adapter.exists(&name).await.unwrap());
}

#[tokio::test]
#[serial(tmux)]
async fn kill_nonexistent_session_succeeds() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();

    let result = adapter.kill("nonexistent-session-xyz").await;
    assert!(result.is_ok());
}

#[tokio::test]
#[serial(tmux)]
async fn exists_returns_true_for_running_session() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("alive");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60", &[], 80, 24)
        .await
        .unwrap();

    assert!(adapter.exists(&name).await.unwrap());

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn exists_returns_false_for_nonexistent_session() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();

    let alive = adapter.exists("nonexistent-session-xyz").await.unwrap();
    assert!(!alive);
}

#[tokio::test]
#[serial(tmux)]
async fn capture_returns_pane_content() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("capture");

    adapter
        .create(
            &name,
            Path::new("/tmp"),
            "echo 'capture-test-output' && sleep 60",
            &[],
            80,
            24,
        )
        .await
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    let output = adapter.capture(&name, Some(10)).await.unwrap();
    assert!(output.contains("capture-test-output"));

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn capture_nonexistent_session_returns_not_found() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();

    let result = adapter.capture("nonexistent-session-xyz", Some(10)).await;
    assert!(matches!(result, Err(SessionError::NotFound(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn resize_changes_window_dimensions() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("resize");

    adapter
        .create(&name, Path::new("/tmp"), "sleep 60", &[], 80, 24)
        .await
        .unwrap();

    adapter.resize(&name, 120, 40).await.unwrap();

    let _ = adapter.kill(&name).await;
}

#[tokio::test]
#[serial(tmux)]
async fn create_rejects_nonexistent_cwd() {
    fail_if_no_tmux!();
    let adapter = TmuxAdapter::new();
    let name = unique_name("badcwd");

    let result = adapter
        .create(&name, Path::new("/nonexistent/path"), "sleep 1", &[], 80, 24)
        .await;

    assert!(matches!(result, Err(SessionError::SpawnFailed(_))));
    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("working directory does not exist"),
        "Expected error about working directory, got: {}",
        err
    );
}

// Tests below modify PATH to simulate tmux being unavailable.

#[tokio::test]
#[serial(tmux)]
async fn create_fails_when_tmux_unavailable() {
    use std::env;

    let original_path = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", "/nonexistent");

    let adapter = TmuxAdapter::new();
    let result = adapter
        .create("test-no-tmux", Path::new("/tmp"), "sleep 1", &[], 80, 24)
        .await;

    env::set_var("PATH", &original_path);

    assert!(matches!(result, Err(SessionError::SpawnFailed(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn send_text_fails_when_tmux_unavailable() {
    use std::env;

    let original_path = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", "/nonexistent");

    let adapter = TmuxAdapter::new();
    let result = adapter.send_text("any-session", "test").await;

    env::set_var("PATH", &original_path);

    assert!(matches!(result, Err(SessionError::CommandFailed(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn kill_succeeds_when_tmux_unavailable() {
    use std::env;

    let original_path = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", "/nonexistent");

    let adapter = TmuxAdapter::new();
    let result = adapter.kill("any-session").await;

    env::set_var("PATH", &original_path);

    // kill() intentionally ignores session-not-found; only subprocess-level
    // failures surface, and a missing tmux binary is one of those.
    assert!(matches!(result, Err(SessionError::CommandFailed(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn exists_fails_when_tmux_unavailable() {
    use std::env;

    let original_path = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", "/nonexistent");

    let adapter = TmuxAdapter::new();
    let result = adapter.exists("any-session").await;

    env::set_var("PATH", &original_path);

    assert!(matches!(result, Err(SessionError::CommandFailed(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn capture_fails_when_tmux_unavailable() {
    use std::env;

    let original_path = env::var("PATH").unwrap_or_default();
    env::set_var("PATH", "/nonexistent");

    let adapter = TmuxAdapter::new();
    let result = adapter.capture("any-session", Some(10)).await;

    env::set_var("PATH", &original_path);

    assert!(matches!(result, Err(SessionError::CommandFailed(_))));
}

#[tokio::test]
#[serial(tmux)]
async fn create_times_out_instead_of_hanging() {
    // No tmux requirement here: point PATH at a shim that sleeps forever so
    // the adapter's own timeout, not tmux's absence, is what's exercised.
    let dir = tempfile::tempdir().unwrap();
    let shim = dir.path().join("tmux");
    std::fs::write(&shim, "#!/bin/sh\nsleep 30\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&shim, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let original_path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", dir.path());

    let adapter = TmuxAdapter::with_timeout(std::time::Duration::from_millis(50));
    let result = adapter
        .create("timeout-session", Path::new("/tmp"), "sleep 1", &[], 80, 24)
        .await;

    std::env::set_var("PATH", &original_path);

    assert!(matches!(result, Err(SessionError::Timeout(_))));
}
