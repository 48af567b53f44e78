//! JSON-RPC 2.0 framing and MCP method dispatch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::tools::{CallError, ToolRegistry};

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;

/// Protocol revisions this server speaks, oldest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// Server name reported by `initialize` and the documentation document.
pub const SERVER_NAME: &str = "yfmcp";

/// Incoming JSON-RPC message. A missing `id` member marks a notification; an
/// explicit `"id": null` is still a request and gets a reply.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Must be `"2.0"`.
    pub jsonrpc: String,
    /// Request id; absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code.
    pub code: i64,
    /// Short description.
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Outgoing JSON-RPC response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Echoed request id, or null when it could not be read.
    pub id: Value,
    /// Success payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }

    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Dispatches MCP methods against a tool registry.
#[derive(Debug, Clone)]
pub struct McpHandler {
    tools: Arc<ToolRegistry>,
}

impl McpHandler {
    /// Handler serving `tools`.
    #[must_use]
    pub const fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Tool registry behind this handler.
    #[must_use]
    pub const fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Handle a raw request body.
    ///
    /// Returns `None` when nothing should be sent back (only notifications).
    pub async fn handle_bytes(&self, body: &[u8]) -> Option<Value> {
        match serde_json::from_slice::<Value>(body) {
            Ok(message) => self.handle_value(message).await,
            Err(err) => Some(
                Response::err(Value::Null, RpcError::new(PARSE_ERROR, format!("Parse error: {err}")))
                    .into_value(),
            ),
        }
    }

    /// Handle one message or a batch.
    pub async fn handle_value(&self, message: Value) -> Option<Value> {
        match message {
            Value::Array(batch) if batch.is_empty() => Some(
                Response::err(Value::Null, RpcError::new(INVALID_REQUEST, "Empty batch"))
                    .into_value(),
            ),
            Value::Array(batch) => {
                let mut replies = Vec::with_capacity(batch.len());
                for item in batch {
                    if let Some(reply) = self.handle_single(item).await {
                        replies.push(reply);
                    }
                }
                (!replies.is_empty()).then_some(Value::Array(replies))
            }
            single => self.handle_single(single).await,
        }
    }

    async fn handle_single(&self, message: Value) -> Option<Value> {
        let has_id = message.get("id").is_some();
        let id_hint = message.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(err) => {
                return Some(
                    Response::err(
                        id_hint,
                        RpcError::new(INVALID_REQUEST, format!("Invalid request: {err}")),
                    )
                    .into_value(),
                );
            }
        };
        if request.jsonrpc != "2.0" {
            return Some(
                Response::err(id_hint, RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""))
                    .into_value(),
            );
        }

        if !has_id {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);

        let outcome = self.dispatch(&request.method, request.params).await;
        let response = match outcome {
            Ok(result) => Response::ok(id, result),
            Err(error) => {
                tracing::debug!(method = %request.method, code = error.code, "request failed");
                Response::err(id, error)
            }
        };
        Some(response.into_value())
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(initialize_result(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools.definitions() })),
            "tools/call" => self.call_tool(params).await,
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params = params.unwrap_or(Value::Null);
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing tool name"))?;
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => serde_json::Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(RpcError::new(INVALID_PARAMS, "arguments must be an object"));
            }
        };

        match self.tools.call(name, &arguments).await {
            Ok(output) => Ok(json!({
                "content": [{"type": "text", "text": output.text}],
                "isError": output.is_error,
            })),
            Err(CallError::UnknownTool(name)) => Err(RpcError::new(
                INVALID_PARAMS,
                format!("Unknown tool: {name}"),
            )),
            Err(CallError::InvalidParams(message)) => Err(RpcError::new(INVALID_PARAMS, message)),
        }
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let requested = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str);
    let latest = SUPPORTED_PROTOCOL_VERSIONS
        .last()
        .copied()
        .unwrap_or("2025-03-26");
    let version = requested
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(latest);
    json!({
        "protocolVersion": version,
        "capabilities": {"tools": {"listChanged": false}},
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
        "instructions": "Yahoo Finance market data: prices, company info, news, \
                         corporate actions, financial statements, holders, options and analyst ratings."
    })
}
