use std::fs;

use comcontrol_mcp::logging::{self, LogFormat};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn json_logs_are_appended_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mcp.log");

    logging::init(LogFormat::Json, Some(&path)).unwrap();
    tracing::info!(jira_ticket = "PROJ-42", "ticket reported");

    let contents = fs::read_to_string(&path).unwrap();
    let line = contents
        .lines()
        .find(|l| l.contains("ticket reported"))
        .expect("log line written");

    let entry: Value = serde_json::from_str(line).unwrap();
    assert_eq!(entry["level"], "INFO");
    assert_eq!(entry["fields"]["jira_ticket"], "PROJ-42");

    // A second subscriber cannot be installed.
    assert!(logging::init(LogFormat::Text, None).is_err());
}
