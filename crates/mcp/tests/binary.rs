use std::io::Write;
use std::process::{Command, Output, Stdio};

use httpmock::prelude::*;
use serde_json::{json, Value};

const ENV_VARS: &[&str] = &[
    "BASE_URL",
    "ENDPOINT",
    "API_KEY",
    "STRICT_CONFIG",
    "REQUIRE_HANDSHAKE",
    "TEST",
    "WATCHDOG_SECS",
    "LOG_FORMAT",
    "LOG_FILE",
];

fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_comcontrol-mcp"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd
}

fn run_with_input(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd.stdin(Stdio::piped()).spawn().unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn strict_mode_without_variables_exits_with_failure() {
    let mut cmd = server_command();
    cmd.env("STRICT_CONFIG", "1").stdin(Stdio::null());

    let output = cmd.output().unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("BASE_URL"), "unexpected stderr: {stderr}");
}

#[test]
fn permissive_mode_exits_cleanly_on_closed_input() {
    let mut cmd = server_command();
    cmd.stdin(Stdio::null());

    let output = cmd.output().unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn answers_requests_over_stdio() {
    let mock = MockServer::start();
    let remote = mock.mock(|when, then| {
        when.method(POST).path("/todos/1").header("x-api-key", "secret");
        then.status(200).json_body(json!({ "title": "Example" }));
    });

    let mut cmd = server_command();
    cmd.env("STRICT_CONFIG", "1")
        .env("BASE_URL", mock.base_url())
        .env("ENDPOINT", "/todos/1")
        .env("API_KEY", "secret");

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","#,
        r#""params":{"name":"report_done","arguments":{"jira_ticket":"PROJ-7"}}}"#,
        "\n",
    );

    let output = run_with_input(cmd, input);
    assert!(output.status.success());

    let responses: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(
        responses[1]["result"]["structuredContent"],
        json!({ "jira_ticket": "PROJ-7", "title": "Example" })
    );
    remote.assert_hits(1);
}
