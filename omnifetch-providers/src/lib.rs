//! Concrete retrieval backends for omnifetch.
//!
//! Six providers implement the `omnifetch-core` contract: the local semantic
//! index, web search, weather, two redundant finance backends and transport
//! directions. [`default_manager`] wires all of them into a
//! [`RetrievalManager`] from a single [`Settings`] value.

mod embedder;
mod finance;
mod http;
pub mod index;
mod local_index;
mod settings;
mod transport;
mod weather;
mod web_search;
mod yahoo_finance;

use std::sync::Arc;

use omnifetch_core::{RetrievalManager, RetrieveError};

pub use embedder::HashEmbedder;
pub use finance::{build_quote_document, FinanceRetriever, FINANCE};
pub use index::{IndexBuilder, IndexError, PersistedIndex};
pub use local_index::{LocalIndexRetriever, LOCAL_INDEX};
pub use settings::{Settings, SettingsBuilder, WebSearchMethod};
pub use transport::{parse_routes, TransportRetriever, TRANSPORT};
pub use weather::{build_weather_document, WeatherRetriever, WEATHER};
pub use web_search::{parse_search_results, WebSearchRetriever, WEB_SEARCH};
pub use yahoo_finance::{
    chart_result, history_documents, quote_document, YahooFinanceRetriever, FINANCE_YAHOO,
};

/// Manager with the fixed default registration: all six providers under
/// their canonical names, and the finance default taken from `settings`.
pub fn default_manager(settings: &Settings) -> Result<RetrievalManager, RetrieveError> {
    let mut manager = match &settings.default_finance_provider {
        Some(provider) => RetrievalManager::with_default_finance_provider(provider.clone()),
        None => RetrievalManager::new(),
    };

    manager.register(Arc::new(LocalIndexRetriever::new(settings)));
    manager.register(Arc::new(WebSearchRetriever::new(settings)?));
    manager.register(Arc::new(WeatherRetriever::new(settings)?));
    manager.register(Arc::new(FinanceRetriever::new(settings)?));
    manager.register(Arc::new(YahooFinanceRetriever::new(settings)?));
    manager.register(Arc::new(TransportRetriever::new(settings)?));

    Ok(manager)
}
