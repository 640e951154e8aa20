use async_trait::async_trait;

use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever, Value};

use crate::http::{build_client, send_json};
use crate::Settings;

pub const TRANSPORT: &str = "transport";

const DEFAULT_MODE: &str = "driving";

/// Route planning between an origin and a destination via a Directions-style
/// API.
///
/// `destination` is a required parameter; `origin` falls back to the query
/// itself; `mode` defaults to `driving`.
pub struct TransportRetriever {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl TransportRetriever {
    pub fn new(settings: &Settings) -> Result<Self, RetrieveError> {
        Ok(Self {
            client: build_client(settings)?,
            api_url: settings.transport_api_url.clone(),
            api_key: settings.transport_api_key.clone(),
        })
    }
}

#[async_trait]
impl Retriever for TransportRetriever {
    fn name(&self) -> &str {
        TRANSPORT
    }

    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RetrieveError::configuration(
                "transport API key is not configured; set TRANSPORT_API_KEY",
            )
        })?;

        let destination = params
            .get_str("destination")
            .map(str::trim)
            .filter(|dest| !dest.is_empty())
            .ok_or_else(|| {
                RetrieveError::validation("destination must be provided for transport queries")
            })?
            .to_string();
        let origin = params
            .get_str("origin")
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .unwrap_or(query)
            .to_string();
        let mode = params.get_str("mode").unwrap_or(DEFAULT_MODE).to_string();
        let top_k = params.top_k()?;

        let pairs: Vec<(&str, &str)> = vec![
            ("origin", origin.as_str()),
            ("destination", destination.as_str()),
            ("mode", mode.as_str()),
            ("key", api_key),
        ];
        let payload = send_json(TRANSPORT, self.client.get(&self.api_url).query(&pairs)).await?;
        let documents = parse_routes(&payload, top_k);

        Ok(Fetched::new(documents)
            .with_metadata("origin", origin)
            .with_metadata("destination", destination)
            .with_metadata("mode", mode))
    }
}

/// Map a directions payload into one document per candidate route, scored
/// `1/rank` in the order the API proposed them.
pub fn parse_routes(payload: &Value, limit: usize) -> Vec<RetrievedDocument> {
    let routes: Vec<&Value> = match payload.get("routes").and_then(Value::as_array) {
        Some(routes) => routes.iter().collect(),
        None if payload.is_object() => vec![payload],
        None => Vec::new(),
    };

    routes
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, route)| {
            let rank = idx + 1;
            let summary = route
                .get("summary")
                .or_else(|| route.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Route {rank}"));

            let first_leg = route
                .get("legs")
                .and_then(Value::as_array)
                .and_then(|legs| legs.first());

            let mut lines = vec![summary];
            if let Some(duration) = first_leg
                .and_then(|leg| leg.get("duration"))
                .and_then(scalar_text)
            {
                lines.push(format!("Duration: {duration}"));
            }
            if let Some(distance) = first_leg
                .and_then(|leg| leg.get("distance"))
                .and_then(scalar_text)
            {
                lines.push(format!("Distance: {distance}"));
            }

            RetrievedDocument::new(lines.join("\n"), TRANSPORT, 1.0 / rank as f64)
                .with_metadata("raw", route.clone())
                .with_metadata("index", rank as u64)
        })
        .collect()
}

/// Normalize duration/distance fields across their `{text}`, `{value}` and
/// bare-scalar representations.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                return Some(text.to_string());
            }
            map.get("value").and_then(scalar_text)
        }
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
