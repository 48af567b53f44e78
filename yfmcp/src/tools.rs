//! Tool registry: definitions, argument parsing and result rendering.
//!
//! Arguments that are missing or of the wrong JSON type are protocol errors
//! ([`CallError::InvalidParams`]). Values outside a tool's accepted set, and
//! every upstream failure, come back as tool text.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use yfmcp_types::{
    FinancialType, HistoryInterval, HistoryPeriod, HolderType, OptionType, RecommendationType,
    YfmcpError,
};
use yfmcp_yahoo::{DEFAULT_MONTHS_BACK, OptionChain, YahooFinance};

/// Failure that maps to a JSON-RPC error rather than tool text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// No tool with this name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// A required argument is missing or has the wrong type.
    #[error("{0}")]
    InvalidParams(String),
}

/// Text returned by a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Payload shown to the caller.
    pub text: String,
    /// True when `text` reports a failure.
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }
}

/// Tool description as listed by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON Schema of the arguments object.
    pub input_schema: Value,
}

/// Render a failure as tool text.
///
/// Unknown tickers and rejected arguments read as plain messages; everything
/// else is prefixed with `Error: `. Whitespace runs (including the newlines of
/// an upstream HTML body) collapse to single spaces so the text is one line.
#[must_use]
pub fn render_error(err: &YfmcpError) -> ToolOutput {
    let message = err.to_string().split_whitespace().collect::<Vec<_>>().join(" ");
    if err.is_user_facing() {
        ToolOutput {
            text: message,
            is_error: false,
        }
    } else {
        ToolOutput {
            text: format!("Error: {message}"),
            is_error: true,
        }
    }
}

/// The nine Yahoo Finance tools.
#[derive(Debug)]
pub struct ToolRegistry {
    yahoo: Arc<YahooFinance>,
}

impl ToolRegistry {
    /// Registry dispatching to `yahoo`.
    #[must_use]
    pub const fn new(yahoo: Arc<YahooFinance>) -> Self {
        Self { yahoo }
    }

    /// Definitions in listing order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        definitions()
    }

    /// Run tool `name` with `args`.
    ///
    /// # Errors
    /// `UnknownTool` or `InvalidParams`; upstream failures are rendered into
    /// the returned [`ToolOutput`] instead.
    #[tracing::instrument(name = "yfmcp::tool", skip(self, args))]
    pub async fn call(&self, name: &str, args: &Map<String, Value>) -> Result<ToolOutput, CallError> {
        let outcome = match name {
            "get_historical_stock_prices" => {
                let ticker = ticker(args)?;
                let period = choice(args, "period", HistoryPeriod::default())?;
                let interval = choice(args, "interval", HistoryInterval::default())?;
                match (period, interval) {
                    (Ok(p), Ok(i)) => json_text(self.yahoo.historical_prices(ticker, p, i).await),
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }
            }
            "get_stock_info" => json_text(self.yahoo.stock_info(ticker(args)?).await),
            "get_yahoo_finance_news" => self.yahoo.news(ticker(args)?).await,
            "get_stock_actions" => json_text(self.yahoo.stock_actions(ticker(args)?).await),
            "get_financial_statement" => {
                let ticker = ticker(args)?;
                match required_choice::<FinancialType>(args, "financial_type")? {
                    Ok(kind) => json_text(self.yahoo.financial_statement(ticker, kind).await),
                    Err(e) => Err(e),
                }
            }
            "get_holder_info" => {
                let ticker = ticker(args)?;
                match required_choice::<HolderType>(args, "holder_type")? {
                    Ok(kind) => json_text(self.yahoo.holder_info(ticker, kind).await),
                    Err(e) => Err(e),
                }
            }
            "get_option_expiration_dates" => {
                json_text(self.yahoo.option_expiration_dates(ticker(args)?).await)
            }
            "get_option_chain" => {
                let ticker = ticker(args)?;
                let date = string_arg(args, "expiration_date")?;
                match required_choice::<OptionType>(args, "option_type")? {
                    Ok(side) => match self.yahoo.option_chain(ticker, date, side).await {
                        Ok(OptionChain::Contracts(rows)) => json_text(Ok(rows)),
                        Ok(OptionChain::NoChain(message)) => Ok(message),
                        Err(e) => Err(e),
                    },
                    Err(e) => Err(e),
                }
            }
            "get_recommendations" => {
                let ticker = ticker(args)?;
                let months_back = months_back(args)?;
                match required_choice::<RecommendationType>(args, "recommendation_type")? {
                    Ok(kind) => {
                        json_text(self.yahoo.recommendations(ticker, kind, months_back).await)
                    }
                    Err(e) => Err(e),
                }
            }
            other => return Err(CallError::UnknownTool(other.to_string())),
        };

        Ok(match outcome {
            Ok(text) => ToolOutput::ok(text),
            Err(err) => {
                if !err.is_user_facing() {
                    tracing::warn!(tool = name, error = %err, "tool call failed");
                }
                render_error(&err)
            }
        })
    }
}

fn json_text<T: Serialize>(result: Result<T, YfmcpError>) -> Result<String, YfmcpError> {
    let value = result?;
    serde_json::to_string(&value).map_err(|e| YfmcpError::Data(e.to_string()))
}

fn string_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, CallError> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(CallError::InvalidParams(format!("{key} must be a string"))),
        None => Err(CallError::InvalidParams(format!(
            "Missing required argument: {key}"
        ))),
    }
}

fn ticker(args: &Map<String, Value>) -> Result<&str, CallError> {
    string_arg(args, "ticker")
}

/// Outer error: the argument is structurally wrong. Inner error: the value is
/// not in the accepted set, reported as tool text.
fn choice<T>(
    args: &Map<String, Value>,
    key: &str,
    default: T,
) -> Result<Result<T, YfmcpError>, CallError>
where
    T: FromStr<Err = YfmcpError>,
{
    match args.get(key) {
        None | Some(Value::Null) => Ok(Ok(default)),
        Some(Value::String(s)) => Ok(s.parse()),
        Some(_) => Err(CallError::InvalidParams(format!("{key} must be a string"))),
    }
}

fn required_choice<T>(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Result<T, YfmcpError>, CallError>
where
    T: FromStr<Err = YfmcpError>,
{
    string_arg(args, key).map(str::parse)
}

fn months_back(args: &Map<String, Value>) -> Result<u32, CallError> {
    match args.get("months_back") {
        None | Some(Value::Null) => Ok(DEFAULT_MONTHS_BACK),
        Some(value) => value
            .as_u64()
            .or_else(|| value.as_f64().and_then(whole_number))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                CallError::InvalidParams("months_back must be a non-negative integer".into())
            }),
    }
}

/// `6.0` counts as `6`; negatives, fractions and non-finite values do not.
fn whole_number(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u64)
}

fn ticker_property() -> Value {
    json!({"type": "string", "description": "Ticker symbol, e.g. \"AAPL\"."})
}

fn enum_property(values: Vec<&'static str>, description: &str) -> Value {
    json!({"type": "string", "enum": values, "description": description})
}

fn schema(properties: Value, required: &[&str]) -> Value {
    json!({"type": "object", "properties": properties, "required": required})
}

/// Every tool definition, in listing order.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_historical_stock_prices",
            description: "Historical OHLCV prices for a ticker. Rows hold Date, Open, High, Low, \
                          Close, Volume and Adj Close.",
            input_schema: schema(
                json!({
                    "ticker": ticker_property(),
                    "period": enum_property(HistoryPeriod::wire_values(), "Look-back window. Default 1mo."),
                    "interval": enum_property(HistoryInterval::wire_values(), "Bar size. Default 1d."),
                }),
                &["ticker"],
            ),
        },
        ToolDefinition {
            name: "get_stock_info",
            description: "Company profile, price, valuation and key statistics in one object.",
            input_schema: schema(json!({"ticker": ticker_property()}), &["ticker"]),
        },
        ToolDefinition {
            name: "get_yahoo_finance_news",
            description: "Recent news articles with title, publisher, publish time and URL.",
            input_schema: schema(json!({"ticker": ticker_property()}), &["ticker"]),
        },
        ToolDefinition {
            name: "get_stock_actions",
            description: "Dividends and stock splits, oldest first.",
            input_schema: schema(json!({"ticker": ticker_property()}), &["ticker"]),
        },
        ToolDefinition {
            name: "get_financial_statement",
            description: "Income statement, balance sheet or cash flow, annual or quarterly.",
            input_schema: schema(
                json!({
                    "ticker": ticker_property(),
                    "financial_type": enum_property(FinancialType::wire_values(), "Statement and period."),
                }),
                &["ticker", "financial_type"],
            ),
        },
        ToolDefinition {
            name: "get_holder_info",
            description: "Major, institutional, mutual fund and insider holdings and transactions.",
            input_schema: schema(
                json!({
                    "ticker": ticker_property(),
                    "holder_type": enum_property(HolderType::wire_values(), "Holder view."),
                }),
                &["ticker", "holder_type"],
            ),
        },
        ToolDefinition {
            name: "get_option_expiration_dates",
            description: "Listed option expiration dates as YYYY-MM-DD.",
            input_schema: schema(json!({"ticker": ticker_property()}), &["ticker"]),
        },
        ToolDefinition {
            name: "get_option_chain",
            description: "Call or put contracts for one expiration date. Use \
                          get_option_expiration_dates to find valid dates.",
            input_schema: schema(
                json!({
                    "ticker": ticker_property(),
                    "expiration_date": {"type": "string", "description": "Expiration date, YYYY-MM-DD."},
                    "option_type": enum_property(OptionType::wire_values(), "Side of the chain."),
                }),
                &["ticker", "expiration_date", "option_type"],
            ),
        },
        ToolDefinition {
            name: "get_recommendations",
            description: "Analyst recommendation trend, or recent upgrades and downgrades with \
                          the latest change per firm.",
            input_schema: schema(
                json!({
                    "ticker": ticker_property(),
                    "recommendation_type": enum_property(RecommendationType::wire_values(), "Analyst view."),
                    "months_back": {
                        "type": "integer",
                        "minimum": 0,
                        "default": DEFAULT_MONTHS_BACK,
                        "description": "Look-back for upgrades_downgrades, in months. Default 12."
                    },
                }),
                &["ticker", "recommendation_type"],
            ),
        },
    ]
}
