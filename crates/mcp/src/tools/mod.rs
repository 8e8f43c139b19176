mod report;

use comcontrol_core::TitleSource;
use serde::Serialize;
use serde_json::Value;

pub use report::{ReportDoneTool, REPORT_DONE};

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

/// Outcome of a tool call. Failures here are reported inside a successful
/// JSON-RPC response, never as a protocol error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Structured payload, mirrored as JSON text for clients that only read `content`.
    pub fn structured(value: Value) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text",
                text: value.to_string(),
            }],
            structured_content: Some(value),
            is_error: false,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text",
                text: msg.into(),
            }],
            structured_content: None,
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

/// Every tool the server exposes. Built once and never modified.
pub struct ToolTable<S> {
    definitions: Vec<ToolDefinition>,
    report_done: ReportDoneTool<S>,
}

impl<S: TitleSource> ToolTable<S> {
    pub fn new(source: S) -> Self {
        Self {
            definitions: vec![report::definition()],
            report_done: ReportDoneTool::new(source),
        }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Runs the named tool, or returns `None` when no such tool exists.
    pub fn call(&self, name: &str, arguments: &Value) -> Option<ToolResult> {
        match name {
            REPORT_DONE => Some(self.report_done.execute(arguments)),
            _ => None,
        }
    }
}
