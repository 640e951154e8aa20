mod common;

use std::sync::Arc;

use common::{FailingRetriever, StaticRetriever};
use omnifetch_core::{Params, RetrievalManager, RetrieveError, RetrievedDocument};

fn manager_with(names: &[&str]) -> RetrievalManager {
    let mut manager = RetrievalManager::new();
    for name in names {
        manager.register(Arc::new(StaticRetriever::new(
            name,
            vec![RetrievedDocument::new(format!("{name} doc"), *name, 1.0)],
        )));
    }
    manager
}

#[test]
fn registration_lifecycle() {
    let mut manager = manager_with(&["alpha", "beta"]);

    assert_eq!(manager.list_retrievers(), vec!["alpha", "beta"]);
    assert!(manager.has_retriever("alpha"));
    assert!(manager.get_retriever("alpha").is_some());

    assert!(manager.unregister("alpha"));
    assert!(!manager.has_retriever("alpha"));
    assert!(manager.get_retriever("alpha").is_none());

    // Unregistering an unknown name is a silent no-op.
    assert!(!manager.unregister("alpha"));
    assert_eq!(manager.list_retrievers(), vec!["beta"]);
}

#[tokio::test]
async fn register_replaces_last_write_wins() {
    let mut manager = RetrievalManager::new();
    manager.register(Arc::new(StaticRetriever::new(
        "web",
        vec![RetrievedDocument::new("old", "web", 1.0)],
    )));
    manager.register(Arc::new(StaticRetriever::new(
        "web",
        vec![RetrievedDocument::new("new", "web", 1.0)],
    )));

    assert_eq!(manager.list_retrievers(), vec!["web"]);
    let result = manager.retrieve("web", "q", Params::new()).await.unwrap();
    assert_eq!(result.documents[0].content, "new");
}

#[tokio::test]
async fn retrieve_unknown_provider_is_not_found() {
    let manager = manager_with(&["alpha"]);
    let err = manager
        .retrieve("nonexistent_provider", "x", Params::new())
        .await
        .unwrap_err();
    match err {
        RetrieveError::NotFound { name, available } => {
            assert_eq!(name, "nonexistent_provider");
            assert_eq!(available, "alpha");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn retrieve_delegates_unmodified() {
    let manager = manager_with(&["alpha"]);
    let result = manager
        .retrieve("alpha", "  spaced   query ", Params::new())
        .await
        .unwrap();
    assert_eq!(result.query, "spaced query");
    assert_eq!(result.provider, "alpha");
    assert_eq!(result.documents[0].content, "alpha doc");
}

#[tokio::test]
async fn errors_propagate_on_single_calls() {
    let mut manager = RetrievalManager::new();
    manager.register(Arc::new(FailingRetriever::configuration("weather")));
    manager.register(Arc::new(FailingRetriever::provider("web")));

    let err = manager
        .retrieve("weather", "q", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RetrieveError::Configuration(_)));

    let err = manager.retrieve("web", "q", Params::new()).await.unwrap_err();
    match err {
        RetrieveError::Provider { provider, .. } => assert_eq!(provider, "web"),
        other => panic!("expected Provider, got {other:?}"),
    }
}

#[tokio::test]
async fn finance_resolution_order() {
    let quote = |name: &str| {
        Arc::new(StaticRetriever::new(
            name,
            vec![RetrievedDocument::new(format!("quote from {name}"), name, 1.0)],
        ))
    };

    // No configured default: the hard-coded fallback wins.
    let mut manager = RetrievalManager::new();
    manager.register(quote("finance"));
    manager.register(quote("finance_yahoo"));
    let result = manager
        .retrieve_finance("AAPL", None, Params::new())
        .await
        .unwrap();
    assert_eq!(result.provider, "finance_yahoo");

    // Configured default beats the fallback.
    let mut manager = RetrievalManager::with_default_finance_provider("finance");
    manager.register(quote("finance"));
    manager.register(quote("finance_yahoo"));
    let result = manager
        .retrieve_finance("AAPL", None, Params::new())
        .await
        .unwrap();
    assert_eq!(result.provider, "finance");

    // Explicit argument beats the configured default.
    let result = manager
        .retrieve_finance("AAPL", Some("finance_yahoo"), Params::new())
        .await
        .unwrap();
    assert_eq!(result.provider, "finance_yahoo");
}
