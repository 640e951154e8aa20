use async_trait::async_trait;

use omnifetch_core::{Fetched, Params, RetrieveError, RetrievedDocument, Retriever, Value};

use crate::http::{build_client, send_json};
use crate::Settings;

pub const WEATHER: &str = "weather";

/// Current-weather lookups against an OpenWeather-compatible endpoint.
///
/// The location comes from the `location` parameter when supplied, else from
/// the query itself. `units` (default `metric`) and `lang` are forwarded.
pub struct WeatherRetriever {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl WeatherRetriever {
    pub fn new(settings: &Settings) -> Result<Self, RetrieveError> {
        Ok(Self {
            client: build_client(settings)?,
            api_url: settings.weather_api_url.clone(),
            api_key: settings.weather_api_key.clone(),
        })
    }
}

#[async_trait]
impl Retriever for WeatherRetriever {
    fn name(&self) -> &str {
        WEATHER
    }

    async fn fetch(&self, query: &str, params: &Params) -> Result<Fetched, RetrieveError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RetrieveError::configuration("weather API key is not configured; set WEATHER_API_KEY")
        })?;

        let location = params
            .get_str("location")
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .unwrap_or(query)
            .to_string();
        let units = params.get_str("units").unwrap_or("metric").to_string();

        let mut pairs: Vec<(&str, &str)> = vec![
            ("q", location.as_str()),
            ("appid", api_key),
            ("units", units.as_str()),
        ];
        if let Some(lang) = params.get_str("lang") {
            pairs.push(("lang", lang));
        }

        let payload = send_json(WEATHER, self.client.get(&self.api_url).query(&pairs)).await?;
        let document = build_weather_document(&payload);

        Ok(Fetched::new(vec![document])
            .with_metadata("requested_location", location)
            .with_metadata("units", units))
    }
}

/// Summarize a raw weather payload into one human-readable document.
pub fn build_weather_document(payload: &Value) -> RetrievedDocument {
    let name = payload
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown location");
    let country = payload
        .get("sys")
        .and_then(|sys| sys.get("country"))
        .and_then(Value::as_str);

    let header = match country {
        Some(country) => format!("Weather for {name}, {country}"),
        None => format!("Weather for {name}"),
    };
    let mut lines = vec![header];

    let descriptions: Vec<String> = payload
        .get("weather")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("description").and_then(Value::as_str))
                .map(capitalize)
                .collect()
        })
        .unwrap_or_default();
    if !descriptions.is_empty() {
        lines.push(format!("Conditions: {}", descriptions.join(", ")));
    }

    if let Some(main) = payload.get("main") {
        if let Some(temp) = main.get("temp").and_then(Value::as_f64) {
            lines.push(format!("Temperature: {temp} deg"));
        }
        if let Some(feels) = main.get("feels_like").and_then(Value::as_f64) {
            lines.push(format!("Feels like: {feels} deg"));
        }
        if let Some(humidity) = main.get("humidity").and_then(Value::as_f64) {
            lines.push(format!("Humidity: {humidity}%"));
        }
    }
    if let Some(speed) = payload
        .get("wind")
        .and_then(|wind| wind.get("speed"))
        .and_then(Value::as_f64)
    {
        lines.push(format!("Wind: {speed} m/s"));
    }

    RetrievedDocument::new(lines.join("\n"), WEATHER, 1.0).with_metadata("raw", payload.clone())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
