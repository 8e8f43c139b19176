use std::io::{self, Read, Write};

use comcontrol_core::TitleSource;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::framing::{Frame, FrameReader, FrameWriter};
use crate::tools::ToolTable;
use crate::transport::{
    empty_result, EnvelopeError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR,
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};

pub const SERVER_NAME: &str = "comcontrol-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: &str = "2025-06-18";

const INSTRUCTIONS: &str = "Use the report_done tool to mark JIRA tickets done.";
const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerOptions {
    /// Reject `tools/list` and `tools/call` until `initialize` has been seen.
    pub require_handshake: bool,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct McpServer<S> {
    tools: ToolTable<S>,
    state: SessionState,
    options: ServerOptions,
}

impl<S: TitleSource> McpServer<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ServerOptions::default())
    }

    pub fn with_options(source: S, options: ServerOptions) -> Self {
        Self {
            tools: ToolTable::new(source),
            state: SessionState::Uninitialized,
            options,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle one decoded message. `None` means nothing is written back,
    /// either because it was a notification or because it had no usable id.
    pub fn handle_message(&mut self, message: Value) -> Option<JsonRpcResponse> {
        let request = match JsonRpcRequest::from_value(message) {
            Ok(request) => request,
            Err(EnvelopeError::MissingMethod { id: Some(id) }) => {
                warn!(id = %id, "request without method");
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    "invalid request",
                    None,
                ));
            }
            Err(e) => {
                warn!(error = %e, "dropping message");
                return None;
            }
        };

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }
        Some(self.dispatch(request))
    }

    fn dispatch(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest { id, method, params } = request;
        let id = id.unwrap_or_default();
        debug!(method = %method, id = %id, "handling request");

        let method = method.as_str();
        if self.options.require_handshake
            && self.state == SessionState::Uninitialized
            && matches!(method, "tools/list" | "tools/call")
        {
            warn!(method, "request before initialize");
            return JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                "server not initialized",
                Some(json!(method)),
            );
        }

        match method {
            "initialize" => self.handle_initialize(id, params.as_ref()),
            "ping" => JsonRpcResponse::success(id, empty_result()),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, params),
            other => {
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, "method not found", Some(json!(other)))
            }
        }
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            INITIALIZED_NOTIFICATION => {
                self.state = SessionState::Ready;
                debug!("client finished initialization");
            }
            other => debug!(method = other, "ignoring notification"),
        }
    }

    fn handle_initialize(&mut self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let client = params
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(client, protocol = PROTOCOL_VERSION, "initialize");

        self.state = SessionState::Ready;

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                },
                "instructions": INSTRUCTIONS
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tools.definitions() }))
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                "invalid call params",
                Some(json!("missing params")),
            );
        };

        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    "invalid call params",
                    Some(json!(e.to_string())),
                )
            }
        };

        let Some(result) = self.tools.call(&call.name, &call.arguments) else {
            warn!(tool = %call.name, "unknown tool");
            let name = json!(call.name);
            return JsonRpcResponse::error(id, METHOD_NOT_FOUND, "unknown tool", Some(name));
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                let data = json!(e.to_string());
                JsonRpcResponse::error(id, INTERNAL_ERROR, "internal error", Some(data))
            }
        }
    }
}

/// Drive `server` from `input` until end-of-stream, writing one response per
/// request that warrants one. Requests are handled strictly in order.
pub fn serve<S, R, W>(server: &mut McpServer<S>, input: R, output: W) -> io::Result<()>
where
    S: TitleSource,
    R: Read,
    W: Write,
{
    let mut frames = FrameReader::new(input);
    let mut writer = FrameWriter::new(output);

    while let Some(frame) = frames.next_frame()? {
        match frame {
            Frame::Message(message) => {
                if let Some(response) = server.handle_message(message) {
                    writer.write_frame(&response)?;
                }
            }
            Frame::Malformed(e) => {
                warn!(code = PARSE_ERROR, error = %e, "skipping malformed input");
            }
        }
    }

    info!("input closed");
    Ok(())
}
