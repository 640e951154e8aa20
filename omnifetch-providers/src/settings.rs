use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WEB_SEARCH_URL: &str = "https://google.serper.dev/search";
const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const DEFAULT_FINANCE_URL: &str = "https://www.alphavantage.co/query";
const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_TRANSPORT_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
const DEFAULT_INDEX_DIR: &str = "data/index";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("omnifetch/", env!("CARGO_PKG_VERSION"));

/// HTTP verb used by the web search backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WebSearchMethod {
    Get,
    #[default]
    Post,
}

/// Endpoint and credential configuration shared by all default backends.
///
/// Values come from the environment via [`Settings::from_env`] or from a
/// [`SettingsBuilder`] in tests. API keys are optional here; a backend that
/// needs a missing key fails with a configuration error at call time, before
/// any request is attempted.
#[derive(Clone)]
pub struct Settings {
    pub web_search_api_url: String,
    pub web_search_api_key: Option<String>,
    pub web_search_method: WebSearchMethod,
    pub web_search_auth_header: String,
    pub web_search_auth_prefix: String,
    pub weather_api_url: String,
    pub weather_api_key: Option<String>,
    pub finance_api_url: String,
    pub finance_api_key: Option<String>,
    pub yahoo_api_url: String,
    pub transport_api_url: String,
    pub transport_api_key: Option<String>,
    pub index_dir: PathBuf,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub default_finance_provider: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            web_search_api_url: DEFAULT_WEB_SEARCH_URL.to_string(),
            web_search_api_key: None,
            web_search_method: WebSearchMethod::default(),
            web_search_auth_header: "X-API-KEY".to_string(),
            web_search_auth_prefix: String::new(),
            weather_api_url: DEFAULT_WEATHER_URL.to_string(),
            weather_api_key: None,
            finance_api_url: DEFAULT_FINANCE_URL.to_string(),
            finance_api_key: None,
            yahoo_api_url: DEFAULT_YAHOO_URL.to_string(),
            transport_api_url: DEFAULT_TRANSPORT_URL.to_string(),
            transport_api_key: None,
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_finance_provider: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("web_search_api_url", &self.web_search_api_url)
            .field("web_search_api_key", &redact(&self.web_search_api_key))
            .field("web_search_method", &self.web_search_method)
            .field("weather_api_url", &self.weather_api_url)
            .field("weather_api_key", &redact(&self.weather_api_key))
            .field("finance_api_url", &self.finance_api_url)
            .field("finance_api_key", &redact(&self.finance_api_key))
            .field("yahoo_api_url", &self.yahoo_api_url)
            .field("transport_api_url", &self.transport_api_url)
            .field("transport_api_key", &redact(&self.transport_api_key))
            .field("index_dir", &self.index_dir)
            .field("request_timeout", &self.request_timeout)
            .field("default_finance_provider", &self.default_finance_provider)
            .finish()
    }
}

fn redact(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "<redacted>"
    } else {
        "<none>"
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Populate settings from the process environment, keeping built-in
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut settings = Settings::default();

        if let Some(url) = env_non_empty("WEB_SEARCH_API_URL") {
            settings.web_search_api_url = url;
        }
        settings.web_search_api_key = env_non_empty("WEB_SEARCH_API_KEY");
        if let Some(method) = env_non_empty("WEB_SEARCH_METHOD") {
            settings.web_search_method = if method.eq_ignore_ascii_case("get") {
                WebSearchMethod::Get
            } else {
                WebSearchMethod::Post
            };
        }
        if let Some(header) = env_non_empty("WEB_SEARCH_AUTH_HEADER") {
            settings.web_search_auth_header = header;
        }
        if let Some(prefix) = env_non_empty("WEB_SEARCH_AUTH_PREFIX") {
            settings.web_search_auth_prefix = prefix;
        }

        if let Some(url) = env_non_empty("WEATHER_API_URL") {
            settings.weather_api_url = url;
        }
        settings.weather_api_key = env_non_empty("WEATHER_API_KEY");

        if let Some(url) = env_non_empty("FINANCE_API_URL") {
            settings.finance_api_url = url;
        }
        settings.finance_api_key = env_non_empty("FINANCE_API_KEY");
        if let Some(url) = env_non_empty("YAHOO_FINANCE_API_URL") {
            settings.yahoo_api_url = url;
        }

        if let Some(url) = env_non_empty("TRANSPORT_API_URL") {
            settings.transport_api_url = url;
        }
        settings.transport_api_key = env_non_empty("TRANSPORT_API_KEY");

        if let Some(dir) = env_non_empty("OMNIFETCH_INDEX_DIR") {
            settings.index_dir = PathBuf::from(dir);
        }
        if let Some(secs) = env_non_empty("REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => settings.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %secs,
                    "REQUEST_TIMEOUT_SECS is not a positive integer; keeping default"
                ),
            }
        }
        settings.default_finance_provider = env_non_empty("FINANCE_PROVIDER");

        settings
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Builder used mostly by tests to assemble settings without touching the
/// environment.
#[derive(Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl fmt::Debug for SettingsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsBuilder")
            .field("settings", &self.settings)
            .finish()
    }
}

impl SettingsBuilder {
    pub fn web_search_api_url(mut self, value: impl Into<String>) -> Self {
        self.settings.web_search_api_url = value.into();
        self
    }

    pub fn web_search_api_key(mut self, value: impl Into<String>) -> Self {
        self.settings.web_search_api_key = non_empty(value.into());
        self
    }

    pub fn web_search_method(mut self, value: WebSearchMethod) -> Self {
        self.settings.web_search_method = value;
        self
    }

    pub fn weather_api_url(mut self, value: impl Into<String>) -> Self {
        self.settings.weather_api_url = value.into();
        self
    }

    pub fn weather_api_key(mut self, value: impl Into<String>) -> Self {
        self.settings.weather_api_key = non_empty(value.into());
        self
    }

    pub fn finance_api_url(mut self, value: impl Into<String>) -> Self {
        self.settings.finance_api_url = value.into();
        self
    }

    pub fn finance_api_key(mut self, value: impl Into<String>) -> Self {
        self.settings.finance_api_key = non_empty(value.into());
        self
    }

    pub fn yahoo_api_url(mut self, value: impl Into<String>) -> Self {
        self.settings.yahoo_api_url = value.into();
        self
    }

    pub fn transport_api_url(mut self, value: impl Into<String>) -> Self {
        self.settings.transport_api_url = value.into();
        self
    }

    pub fn transport_api_key(mut self, value: impl Into<String>) -> Self {
        self.settings.transport_api_key = non_empty(value.into());
        self
    }

    pub fn index_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.settings.index_dir = value.into();
        self
    }

    pub fn request_timeout(mut self, value: Duration) -> Self {
        self.settings.request_timeout = value;
        self
    }

    pub fn default_finance_provider(mut self, value: impl Into<String>) -> Self {
        self.settings.default_finance_provider = non_empty(value.into());
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
