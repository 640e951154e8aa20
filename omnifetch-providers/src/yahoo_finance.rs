use async_trait::async_trait;
use chrono::DateTime;

use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever, Value};

use crate::http::{build_client, send_json};
use crate::Settings;

pub const FINANCE_YAHOO: &str = "finance_yahoo";

/// Quote and history lookups against a Yahoo-style chart API; the redundant
/// twin of the `finance` backend, usable without an API key.
///
/// Quote mode (the default) reads the latest price and previous close from
/// the chart metadata. History mode kicks in when a `range` parameter is
/// supplied and yields one document per bar, newest first; `interval`
/// (default `1d`) is forwarded.
pub struct YahooFinanceRetriever {
    client: reqwest::Client,
    api_url: String,
}

impl YahooFinanceRetriever {
    pub fn new(settings: &Settings) -> Result<Self, RetrieveError> {
        Ok(Self {
            client: build_client(settings)?,
            api_url: settings.yahoo_api_url.clone(),
        })
    }
}

#[async_trait]
impl Retriever for YahooFinanceRetriever {
    fn name(&self) -> &str {
        FINANCE_YAHOO
    }

    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError> {
        let symbol = params
            .get_str("symbol")
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or(query)
            .to_uppercase();
        let interval = params.get_str("interval").unwrap_or("1d").to_string();
        let range = params.get_str("range").map(str::to_string);
        let history = range.is_some();

        let url = format!("{}/{}", self.api_url.trim_end_matches('/'), symbol);
        let pairs: Vec<(&str, &str)> = vec![
            ("range", range.as_deref().unwrap_or("1d")),
            ("interval", interval.as_str()),
        ];
        let payload = send_json(FINANCE_YAHOO, self.client.get(&url).query(&pairs)).await?;

        let result = chart_result(&payload).ok_or_else(|| {
            RetrieveError::provider(
                FINANCE_YAHOO,
                format!("chart response contained no data for {symbol}"),
            )
        })?;

        let (documents, mode) = if history {
            (history_documents(&symbol, result), "history")
        } else {
            let document = quote_document(&symbol, result).ok_or_else(|| {
                RetrieveError::provider(
                    FINANCE_YAHOO,
                    format!("chart response contained no price for {symbol}"),
                )
            })?;
            (vec![document], "quote")
        };

        if documents.is_empty() {
            return Err(RetrieveError::provider(
                FINANCE_YAHOO,
                format!("no {mode} data returned for {symbol}"),
            ));
        }

        Ok(Fetched::new(documents)
            .with_metadata("requested_symbol", symbol)
            .with_metadata("mode", mode))
    }
}

/// First entry of `chart.result`, where both the metadata and the bar
/// series live.
pub fn chart_result(payload: &Value) -> Option<&Value> {
    payload
        .get("chart")?
        .get("result")?
        .as_array()?
        .first()
}

/// Latest-quote document derived from the chart metadata: price, previous
/// close and the change computed from the two.
pub fn quote_document(symbol: &str, result: &Value) -> Option<RetrievedDocument> {
    let meta = result.get("meta")?;
    let price = meta.get("regularMarketPrice").and_then(Value::as_f64)?;
    let prev_close = meta
        .get("chartPreviousClose")
        .or_else(|| meta.get("previousClose"))
        .and_then(Value::as_f64);

    let mut lines = vec![format!("Symbol: {symbol}"), format!("Price: {price:.2}")];
    if let Some(prev_close) = prev_close.filter(|close| *close != 0.0) {
        let change = price - prev_close;
        let percent = change / prev_close * 100.0;
        lines.push(format!("Change: {change:+.2}"));
        lines.push(format!("Change %: {percent:+.2}%"));
    }

    Some(
        RetrievedDocument::new(lines.join("\n"), FINANCE_YAHOO, 1.0)
            .with_metadata("raw", meta.clone()),
    )
}

/// One document per bar, newest first, scored `1/rank`.
pub fn history_documents(symbol: &str, result: &Value) -> Vec<RetrievedDocument> {
    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let empty = Value::Null;
    let series = result
        .get("indicators")
        .and_then(|indicators| indicators.get("quote"))
        .and_then(Value::as_array)
        .and_then(|quotes| quotes.first())
        .unwrap_or(&empty);

    let mut documents = Vec::new();
    for (rank, idx) in (0..timestamps.len()).rev().enumerate() {
        let Some(ts) = timestamps[idx].as_i64() else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| ts.to_string());

        let mut lines = vec![format!("Symbol: {symbol}"), format!("Date: {date}")];
        for (label, field) in [
            ("Open", "open"),
            ("High", "high"),
            ("Low", "low"),
            ("Close", "close"),
            ("Volume", "volume"),
        ] {
            if let Some(value) = series
                .get(field)
                .and_then(|values| values.get(idx))
                .and_then(Value::as_f64)
            {
                lines.push(format!("{label}: {value}"));
            }
        }

        documents.push(
            RetrievedDocument::new(lines.join("\n"), FINANCE_YAHOO, 1.0 / (rank + 1) as f64)
                .with_metadata("mode", "history")
                .with_metadata("date", date),
        );
    }
    documents
}
