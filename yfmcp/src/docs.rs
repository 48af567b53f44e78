use serde_json::{Value, json};

use crate::protocol::{SERVER_NAME, SUPPORTED_PROTOCOL_VERSIONS};
use crate::tools::definitions;

/// Capability document served at `GET /`.
#[must_use]
pub fn document() -> Value {
    let tools: Vec<Value> = definitions()
        .into_iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.input_schema,
            })
        })
        .collect();

    json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Model Context Protocol server for Yahoo Finance market data.",
        "protocolVersions": SUPPORTED_PROTOCOL_VERSIONS,
        "transports": {
            "streamableHttp": {"endpoint": "/mcp", "method": "POST"},
            "sse": {
                "endpoint": "/sse",
                "method": "GET",
                "messages": "/sse/message?sessionId=<id>"
            }
        },
        "tools": tools,
    })
}
