//! Integration tests that run the CLI binary.

use std::io::Write;
use std::process::{Command, Stdio};

/// Binary with config and data directories isolated in `home`.
fn bin(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_avidia"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("AVIDIA_BASE_URL")
        .env_remove("RUST_LOG")
        // Run from the temp dir so dotenv() won't load .env from the project root
        .current_dir(home);
    cmd
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("translate"), "expected subcommands in usage text");
    assert!(stdout.contains("AVIDIA_BASE_URL"));
}

#[test]
fn cli_version_succeeds() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("avidia"));
}

#[test]
fn normalize_reads_stdin() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut child = bin(tmp.path())
        .args(["normalize", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("binary not found - run cargo build first");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"# Heading\nSome <b>text</b> with **bold**\n- item")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Heading\nSome text with bold\n• item\n"
    );
}

#[test]
fn no_subcommand_lists_tools_with_chat_active() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path()).output().expect("run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap_or("");
    assert!(first.starts_with("* ai-chat"), "got: {}", stdout);
    assert_eq!(stdout.lines().count(), 7);
}

#[test]
fn tool_switch_is_persisted() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["tool", "summarizer"])
        .output()
        .expect("run binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = bin(tmp.path()).arg("tools").output().expect("run binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("* summarizer"), "got: {}", stdout);

    let output = bin(tmp.path())
        .args(["tool", "plagiarism"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid tool"));
}

#[test]
fn invalid_base_url_exits_with_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .env("AVIDIA_BASE_URL", "ftp://example.com")
        .arg("status")
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("AVIDIA_BASE_URL"),
        "expected base URL error message, got: {}",
        stderr
    );
}

#[test]
fn blank_input_is_rejected_before_any_request() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .env("AVIDIA_BASE_URL", "http://127.0.0.1:9")
        .args(["translate", "   "])
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please enter text to translate"), "got: {}", stderr);
}

#[test]
fn custom_templates_can_be_added_and_listed() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["templates", "add", "haiku", "-d", "Short poems", "-p", "Write a haiku about {text}"])
        .output()
        .expect("run binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = bin(tmp.path())
        .args(["templates", "list"])
        .output()
        .expect("run binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("haiku"));
    assert!(stdout.contains("custom"));
    assert!(stdout.contains("blog-post"));
}
