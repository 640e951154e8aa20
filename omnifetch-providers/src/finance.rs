use async_trait::async_trait;
use serde_json::Map;

use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever, Value};

use crate::http::{build_client, send_json};
use crate::Settings;

pub const FINANCE: &str = "finance";

const DEFAULT_FUNCTION: &str = "GLOBAL_QUOTE";

/// Quote lookups against an Alpha-Vantage-style API.
///
/// The ticker comes from the `symbol` parameter when supplied, else from the
/// query, uppercased either way. The `function` parameter selects the API
/// function (default `GLOBAL_QUOTE`).
pub struct FinanceRetriever {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl FinanceRetriever {
    pub fn new(settings: &Settings) -> Result<Self, RetrieveError> {
        Ok(Self {
            client: build_client(settings)?,
            api_url: settings.finance_api_url.clone(),
            api_key: settings.finance_api_key.clone(),
        })
    }
}

#[async_trait]
impl Retriever for FinanceRetriever {
    fn name(&self) -> &str {
        FINANCE
    }

    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RetrieveError::configuration("finance API key is not configured; set FINANCE_API_KEY")
        })?;

        let symbol = params
            .get_str("symbol")
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or(query)
            .to_uppercase();
        let function = params
            .get_str("function")
            .unwrap_or(DEFAULT_FUNCTION)
            .to_string();

        let pairs: Vec<(&str, &str)> = vec![
            ("function", function.as_str()),
            ("symbol", symbol.as_str()),
            ("apikey", api_key),
        ];
        let payload = send_json(FINANCE, self.client.get(&self.api_url).query(&pairs)).await?;

        let document = build_quote_document(&symbol, &payload).ok_or_else(|| {
            RetrieveError::provider(
                FINANCE,
                format!("response did not contain quote data for {symbol}"),
            )
        })?;

        Ok(Fetched::new(vec![document])
            .with_metadata("requested_symbol", symbol)
            .with_metadata("function", function))
    }
}

/// Turn a quote payload into a document, or `None` when no quote object (or
/// no priced fields) can be located.
pub fn build_quote_document(symbol: &str, payload: &Value) -> Option<RetrievedDocument> {
    let quote = extract_quote(payload)?;

    let price = quote_field(quote, &["price", "05. price"]);
    let change = quote_field(quote, &["change", "09. change"]);
    let percent = quote_field(quote, &["change_percent", "10. change percent"]);

    if price.is_none() && change.is_none() && percent.is_none() {
        return None;
    }

    let mut lines = vec![format!("Symbol: {symbol}")];
    if let Some(price) = price {
        lines.push(format!("Price: {price}"));
    }
    if let Some(change) = change {
        lines.push(format!("Change: {change}"));
    }
    if let Some(percent) = percent {
        lines.push(format!("Change %: {percent}"));
    }

    Some(RetrievedDocument::new(lines.join("\n"), FINANCE, 1.0).with_metadata("raw", payload.clone()))
}

/// Find the quote object across the response shapes the API returns.
fn extract_quote(payload: &Value) -> Option<&Map<String, Value>> {
    let map = payload.as_object()?;
    for key in ["Global Quote", "Quote", "data"] {
        if let Some(quote) = map.get(key).and_then(Value::as_object) {
            return Some(quote);
        }
    }
    Some(map)
}

fn quote_field(quote: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        quote.get(*key).and_then(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}
