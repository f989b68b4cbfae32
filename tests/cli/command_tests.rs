//! `config`, `serve` and `watch` subcommand tests

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::{Child, ChildStdin, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use dashcast::client::WatchClient;
use dashcast::ChannelValue;
use tempfile::TempDir;

use crate::common::{assert_field, TestSession};

fn binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dashcast"));
    cmd.env_remove("DASHCAST_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn run_cli(args: &[&str]) -> Output {
    binary().args(args).output().expect("Failed to run CLI")
}

/// Find a free port by binding and releasing an ephemeral one
fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}

#[test]
fn test_config_prints_file_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

    let output = run_cli(&["config", "--config", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port = 4000"), "stdout: {}", stdout);
    assert!(stdout.contains("interval_ms = 500"), "stdout: {}", stdout);
}

#[test]
fn test_malformed_config_exit_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\n").unwrap();

    let output = run_cli(&["config", "--config", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_serve_rejects_invalid_host() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");
    let output = binary()
        .args(["serve", "--config", path.to_str().unwrap(), "--host", "nowhere"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

/// Spawn `serve` on `port` with piped stdin and a client connected to it
fn spawn_serve(dir: &TempDir, port: u16) -> (Child, ChildStdin, WatchClient) {
    let config = dir.path().join("missing.toml");
    let mut child = binary()
        .args(["serve", "--config", config.to_str().unwrap(), "--host", "127.0.0.1"])
        .args(["--port", &port.to_string()])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    let client = loop {
        match WatchClient::connect(("127.0.0.1", port)) {
            Ok(client) => break client,
            Err(_) if Instant::now() < deadline => std::thread::sleep(Duration::from_millis(20)),
            Err(e) => panic!("serve never started listening: {}", e),
        }
    };
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    let stdin = child.stdin.take().unwrap();
    (child, stdin, client)
}

#[test]
fn test_serve_broadcasts_stdin_events() {
    let dir = TempDir::new().unwrap();
    let (mut child, mut stdin, mut client) = spawn_serve(&dir, free_port());

    writeln!(stdin, r#"{{"event":"started"}}"#).unwrap();
    writeln!(stdin, "not json").unwrap();
    writeln!(stdin, r#"{{"event":"channel","name":"truck.speed","value":{{"float":22.5}}}}"#).unwrap();
    writeln!(stdin, r#"{{"event":"frame_start"}}"#).unwrap();
    writeln!(stdin, r#"{{"event":"frame_end"}}"#).unwrap();
    stdin.flush().unwrap();

    let doc = client.next_document().unwrap();
    assert_field(&doc, "state", serde_json::json!("drive"));
    assert_field(&doc, "telemetry.truck.speed", serde_json::json!(22.5));

    drop(stdin);
    let status = child.wait().unwrap();
    assert!(status.success());
}

#[test]
fn test_serve_skips_non_utf8_lines() {
    let dir = TempDir::new().unwrap();
    let (mut child, mut stdin, mut client) = spawn_serve(&dir, free_port());

    stdin.write_all(b"\xff\xfe garbage\n").unwrap();
    writeln!(stdin, r#"{{"event":"channel","name":"truck.gear","value":{{"s32":3}}}}"#).unwrap();
    writeln!(stdin, r#"{{"event":"frame_start"}}"#).unwrap();
    writeln!(stdin, r#"{{"event":"frame_end"}}"#).unwrap();
    stdin.flush().unwrap();

    let doc = client.next_document().unwrap();
    assert_field(&doc, "telemetry.truck.gear", serde_json::json!(3));

    drop(stdin);
    let status = child.wait().unwrap();
    assert!(status.success(), "serve exited with {:?}", status.code());
}

/// Spawn `watch` against `port`; stdout lines arrive on the returned channel
fn spawn_watch(port: u16, field: Option<&str>) -> (Child, Receiver<String>) {
    let mut cmd = binary();
    cmd.args(["watch", "--host", "127.0.0.1", "--port", &port.to_string()]);
    if let Some(field) = field {
        cmd.args(["--field", field]);
    }
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    (child, rx)
}

#[test]
fn test_watch_prints_field_while_driving() {
    let mut test = TestSession::new();
    let (mut child, lines) = spawn_watch(test.addr().port(), Some("telemetry.truck.speed"));
    test.wait_for_clients(1);

    // Still in startup: nothing printed for this frame
    test.channel("truck.speed", ChannelValue::Float(10.0));
    test.emit();

    test.session.on_started();
    test.channel("truck.speed", ChannelValue::Float(22.5));
    test.emit();

    let line = lines.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(line, "telemetry.truck.speed: 22.5");

    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
fn test_watch_prints_whole_document() {
    let mut test = TestSession::new();
    let (mut child, lines) = spawn_watch(test.addr().port(), None);
    test.wait_for_clients(1);

    test.channel("truck.speed", ChannelValue::Float(22.5));
    test.emit();

    let line = lines.recv_timeout(Duration::from_secs(5)).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_field(&doc, "state", serde_json::json!("startup"));
    assert_field(&doc, "telemetry.truck.speed", serde_json::json!(22.5));
    assert!(!line.contains(' '), "document should be compact: {}", line);

    child.kill().unwrap();
    child.wait().unwrap();
}
