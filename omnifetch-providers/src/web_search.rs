use async_trait::async_trait;
use serde_json::{json, Map};

use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever, Value};

use crate::http::{build_client, send_json};
use crate::{Settings, WebSearchMethod};

pub const WEB_SEARCH: &str = "web_search";

/// Real-time web search over a configurable HTTP API (Serper-style POST by
/// default, Bing-style GET supported).
pub struct WebSearchRetriever {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    method: WebSearchMethod,
    auth_header: String,
    auth_prefix: String,
}

impl WebSearchRetriever {
    pub fn new(settings: &Settings) -> Result<Self, RetrieveError> {
        Ok(Self {
            client: build_client(settings)?,
            api_url: settings.web_search_api_url.clone(),
            api_key: settings.web_search_api_key.clone(),
            method: settings.web_search_method,
            auth_header: settings.web_search_auth_header.clone(),
            auth_prefix: settings.web_search_auth_prefix.clone(),
        })
    }

    fn auth_value(&self, api_key: &str) -> String {
        if self.auth_prefix.is_empty() {
            api_key.to_string()
        } else {
            format!("{}{}", self.auth_prefix, api_key)
        }
    }
}

#[async_trait]
impl Retriever for WebSearchRetriever {
    fn name(&self) -> &str {
        WEB_SEARCH
    }

    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RetrieveError::configuration(
                "web search API key is not configured; set WEB_SEARCH_API_KEY",
            )
        })?;
        let top_k = params.top_k()?;

        // Backend-specific extras ride along under a nested "params" object.
        let extra = match params.get("params") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        let request = match self.method {
            WebSearchMethod::Post => {
                let mut body = Map::new();
                body.insert("q".to_string(), json!(query));
                body.insert("num".to_string(), json!(top_k));
                body.extend(extra);
                self.client
                    .post(&self.api_url)
                    .header(self.auth_header.as_str(), self.auth_value(api_key))
                    .json(&Value::Object(body))
            }
            WebSearchMethod::Get => {
                let mut pairs: Vec<(String, String)> = vec![
                    ("q".to_string(), query.to_string()),
                    ("count".to_string(), top_k.to_string()),
                ];
                for (key, value) in extra {
                    pairs.push((key, stringify(&value)));
                }
                self.client
                    .get(&self.api_url)
                    .header(self.auth_header.as_str(), self.auth_value(api_key))
                    .query(&pairs)
            }
        };

        let payload = send_json(WEB_SEARCH, request).await?;
        let documents = parse_search_results(&payload, top_k);
        let count = documents.len();
        Ok(Fetched::new(documents).with_metadata("raw_item_count", count as u64))
    }
}

/// Map a search payload into ranked documents, at most `limit` of them.
///
/// Score comes from the item itself when present, otherwise decays as
/// `1/position`.
pub fn parse_search_results(payload: &Value, limit: usize) -> Vec<RetrievedDocument> {
    extract_items(payload)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, item)| {
            let position = idx + 1;
            let url = item
                .get("url")
                .or_else(|| item.get("link"))
                .and_then(Value::as_str);
            let title = item
                .get("title")
                .and_then(Value::as_str)
                .or(url)
                .unwrap_or("untitled");
            let snippet = item
                .get("snippet")
                .or_else(|| item.get("description"))
                .and_then(Value::as_str)
                .unwrap_or("");
            let content = format!("{title}\n{snippet}").trim().to_string();
            let score = item
                .get("score")
                .and_then(Value::as_f64)
                .unwrap_or(1.0 / position as f64);

            let mut document = RetrievedDocument::new(content, "web", score)
                .with_metadata("position", position as u64)
                .with_metadata("raw", item.clone());
            if let Some(url) = url {
                document = document.with_metadata("url", url);
            }
            document
        })
        .collect()
}

/// Locate the result list across the payload shapes different search APIs
/// return: either a bare array or the first list-valued key among the known
/// candidates.
fn extract_items(payload: &Value) -> Vec<&Map<String, Value>> {
    let list = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["items", "data", "results", "value", "organic"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };

    list.map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
