use comcontrol_core::TitleSource;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{ToolDefinition, ToolResult};

pub const REPORT_DONE: &str = "report_done";

const TICKET_ARG: &str = "jira_ticket";
const MISSING_TICKET: &str = "missing required input: jira_ticket";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: REPORT_DONE.to_string(),
        description: "Marks a JIRA ticket as done by calling a remote endpoint \
                      and returns the resulting title."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                TICKET_ARG: {
                    "type": "string",
                    "description": "The JIRA ticket key to report as done (e.g., PROJ-123)"
                }
            },
            "required": [TICKET_ARG]
        }),
        output_schema: Some(json!({
            "type": "object",
            "properties": {
                TICKET_ARG: { "type": "string" },
                "title": { "type": "string" }
            },
            "required": [TICKET_ARG, "title"]
        })),
    }
}

pub struct ReportDoneTool<S> {
    source: S,
}

impl<S: TitleSource> ReportDoneTool<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn execute(&self, arguments: &Value) -> ToolResult {
        let Some(ticket) = arguments
            .get(TICKET_ARG)
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
        else {
            warn!(tool = REPORT_DONE, "call without {}", TICKET_ARG);
            return ToolResult::error(MISSING_TICKET);
        };

        match self.source.fetch_title() {
            Ok(title) => {
                info!(tool = REPORT_DONE, jira_ticket = ticket, title = %title, "ticket reported");
                ToolResult::structured(json!({
                    TICKET_ARG: ticket,
                    "title": title
                }))
            }
            Err(e) => {
                warn!(
                    tool = REPORT_DONE,
                    jira_ticket = ticket,
                    error = %e,
                    "remote request failed"
                );
                ToolResult::error(format!("remote request failed: {e}"))
            }
        }
    }
}
