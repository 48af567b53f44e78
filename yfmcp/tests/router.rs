use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::{Stream, StreamExt};
use serde_json::{Value, json};
use tower::ServiceExt;
use yfmcp::{AppState, router};
use yfmcp_mock::MockAdapter;
use yfmcp_types::ServerConfig;

fn app() -> Router {
    router(AppState::new(MockAdapter::connector()), &ServerConfig::default())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn rpc(app: Router, body: Value) -> Value {
    let resp = app.oneshot(post_json("/mcp", &body.to_string())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call_tool(name: &str, arguments: Value) -> Value {
    rpc(
        app(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
               "params": {"name": name, "arguments": arguments}}),
    )
    .await
}

/// Read chunks until one complete SSE event has arrived.
async fn read_event<S, E>(events: &mut S) -> String
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Debug,
{
    let mut seen = String::new();
    while !seen.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), events.next())
            .await
            .expect("event before timeout")
            .expect("stream open")
            .expect("chunk");
        seen.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    seen
}

fn tool_text(reply: &Value) -> &str {
    reply["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn root_serves_documentation() {
    let resp = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: Value =
        serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(doc["name"], "yfmcp");
    assert_eq!(doc["tools"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn unknown_paths_and_methods_are_404() {
    for (method, uri) in [("GET", "/nope"), ("GET", "/mcp"), ("DELETE", "/sse"), ("POST", "/")] {
        let resp = app()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn initialize_negotiates_version() {
    let reply = rpc(
        app(),
        json!({"jsonrpc": "2.0", "id": "init", "method": "initialize",
               "params": {"protocolVersion": "2024-11-05", "capabilities": {},
                          "clientInfo": {"name": "test", "version": "0"}}}),
    )
    .await;
    assert_eq!(reply["id"], "init");
    assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(reply["result"]["serverInfo"]["name"], "yfmcp");
    assert!(reply["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn notifications_are_accepted_without_body() {
    let resp = app()
        .oneshot(post_json(
            "/mcp",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn null_id_is_a_request_not_a_notification() {
    let reply = rpc(app(), json!({"jsonrpc": "2.0", "id": null, "method": "ping"})).await;
    assert_eq!(reply["id"], Value::Null);
    assert_eq!(reply["result"], json!({}));
}

#[tokio::test]
async fn whole_number_float_months_back_is_accepted() {
    let reply = call_tool(
        "get_recommendations",
        json!({"ticker": "AAPL", "recommendation_type": "upgrades_downgrades", "months_back": 12.0}),
    )
    .await;
    assert_eq!(reply["result"]["isError"], false);
    let rows: Value = serde_json::from_str(tool_text(&reply)).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn protocol_errors() {
    let resp = app().oneshot(post_json("/mcp", "{not json")).await.unwrap();
    let reply: Value =
        serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(reply["error"]["code"], -32700);
    assert_eq!(reply["id"], Value::Null);

    let reply = rpc(app(), json!({"jsonrpc": "2.0", "id": 2, "method": "resources/list"})).await;
    assert_eq!(reply["error"]["code"], -32601);

    let reply = call_tool("get_weather", json!({"ticker": "AAPL"})).await;
    assert_eq!(reply["error"]["code"], -32602);

    let reply = call_tool("get_stock_info", json!({})).await;
    assert_eq!(reply["error"]["code"], -32602);
}

#[tokio::test]
async fn ping_and_tools_list() {
    let reply = rpc(app(), json!({"jsonrpc": "2.0", "id": 3, "method": "ping"})).await;
    assert_eq!(reply["result"], json!({}));

    let reply = rpc(app(), json!({"jsonrpc": "2.0", "id": 4, "method": "tools/list"})).await;
    let names: Vec<&str> = reply["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "get_historical_stock_prices",
            "get_stock_info",
            "get_yahoo_finance_news",
            "get_stock_actions",
            "get_financial_statement",
            "get_holder_info",
            "get_option_expiration_dates",
            "get_option_chain",
            "get_recommendations",
        ]
    );
    assert!(reply["result"]["tools"][0]["inputSchema"]["properties"]["period"]["enum"].is_array());
}

#[tokio::test]
async fn batch_skips_notifications() {
    let reply = rpc(
        app(),
        json!([
            {"jsonrpc": "2.0", "id": 1, "method": "ping"},
            {"jsonrpc": "2.0", "method": "notifications/initialized"},
            {"jsonrpc": "2.0", "id": 2, "method": "ping"}
        ]),
    )
    .await;
    let ids: Vec<i64> = reply
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn tool_results_are_json_text() {
    let reply = call_tool("get_stock_info", json!({"ticker": "AAPL"})).await;
    assert_eq!(reply["result"]["isError"], false);
    let info: Value = serde_json::from_str(tool_text(&reply)).unwrap();
    assert_eq!(info["sector"], "Technology");

    let reply = call_tool(
        "get_historical_stock_prices",
        json!({"ticker": "AAPL", "period": "5d", "interval": "1d"}),
    )
    .await;
    let rows: Value = serde_json::from_str(tool_text(&reply)).unwrap();
    assert_eq!(rows[0]["Date"], "2024-01-02T14:30:00.000Z");

    let reply = call_tool("get_option_expiration_dates", json!({"ticker": "AAPL"})).await;
    assert_eq!(tool_text(&reply), r#"["2024-01-19","2024-01-26"]"#);
}

#[tokio::test]
async fn user_facing_messages_are_verbatim() {
    let reply = call_tool("get_stock_info", json!({"ticker": "ZZZZ"})).await;
    assert_eq!(tool_text(&reply), "Ticker ZZZZ not found.");

    let reply = call_tool(
        "get_financial_statement",
        json!({"ticker": "AAPL", "financial_type": "bogus"}),
    )
    .await;
    assert_eq!(tool_text(&reply), "Invalid financial type: bogus");

    let reply = call_tool(
        "get_option_chain",
        json!({"ticker": "AAPL", "expiration_date": "2024-01-19", "option_type": "straddle"}),
    )
    .await;
    assert_eq!(
        tool_text(&reply),
        "Invalid option type. Please use 'calls' or 'puts'."
    );

    let reply = call_tool(
        "get_option_chain",
        json!({"ticker": "AAPL", "expiration_date": "2030-01-01", "option_type": "calls"}),
    )
    .await;
    assert!(tool_text(&reply).contains("get_option_expiration_dates"));

    let reply = call_tool("get_yahoo_finance_news", json!({"ticker": "MSFT"})).await;
    assert_eq!(tool_text(&reply), "No news found for MSFT.");
}

#[tokio::test]
async fn upstream_failures_render_as_error_text() {
    let reply = call_tool("get_stock_actions", json!({"ticker": "FAIL"})).await;
    assert!(reply.get("error").is_none());
    assert_eq!(reply["result"]["isError"], true);
    assert!(tool_text(&reply).starts_with("Error: upstream returned HTTP 500"));
}

#[tokio::test]
async fn sse_round_trip() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(Request::get("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let mut events = resp.into_body().into_data_stream();
    let opened = read_event(&mut events).await;
    assert!(opened.contains("event: endpoint"));
    let endpoint = opened
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap()
        .to_string();
    assert!(endpoint.starts_with("/sse/message?sessionId="));

    let resp = app
        .clone()
        .oneshot(post_json(
            &endpoint,
            r#"{"jsonrpc":"2.0","id":42,"method":"tools/list"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let delivered = read_event(&mut events).await;
    assert!(delivered.contains("event: message"));
    let data = delivered
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let reply: Value = serde_json::from_str(data).unwrap();
    assert_eq!(reply["id"], 42);
    assert_eq!(reply["result"]["tools"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn sse_message_requires_known_session() {
    let resp = app()
        .oneshot(post_json("/sse/message?sessionId=deadbeef", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app().oneshot(post_json("/sse/message", "{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
