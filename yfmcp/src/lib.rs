//! yfmcp
//!
//! Model Context Protocol server for Yahoo Finance. Nine tools are exposed
//! over two transports:
//!
//! - Streamable HTTP: `POST /mcp` with a JSON-RPC request or batch;
//! - legacy SSE: `GET /sse` opens the stream, `POST /sse/message?sessionId=<id>`
//!   submits messages whose replies arrive on that stream.
//!
//! `GET /` returns a JSON document describing the server and its tools.
#![warn(missing_docs)]

/// Capability document for `GET /`.
pub mod docs;
/// JSON-RPC framing and MCP method dispatch.
pub mod protocol;
/// Router, transports and the serve loop.
pub mod server;
/// Tool definitions and invocation.
pub mod tools;

pub use protocol::McpHandler;
pub use server::{AppState, ServerError, router, serve};
pub use tools::{ToolOutput, ToolRegistry};
