use serde_json::Value;

use super::{array_at, iso_from_epoch};

/// Number of articles requested from the search endpoint.
pub const NEWS_COUNT: u32 = 10;

/// Render the search payload's `news` array as text blocks.
///
/// Each block is `Title / Publisher / Published / URL` on separate lines;
/// blocks are separated by a blank line. Returns `No news found for {ticker}.`
/// when there are no articles.
#[must_use]
pub fn render(payload: &Value, ticker: &str) -> String {
    let blocks: Vec<String> = array_at(payload, "news").iter().map(block).collect();
    if blocks.is_empty() {
        return format!("No news found for {ticker}.");
    }
    blocks.join("\n\n")
}

fn block(article: &Value) -> String {
    let text = |key: &str| article.get(key).and_then(Value::as_str).unwrap_or_default();
    let published = article
        .get("providerPublishTime")
        .and_then(Value::as_i64)
        .and_then(iso_from_epoch)
        .unwrap_or_default();
    format!(
        "Title: {}\nPublisher: {}\nPublished: {}\nURL: {}",
        text("title"),
        text("publisher"),
        published,
        text("link"),
    )
}
