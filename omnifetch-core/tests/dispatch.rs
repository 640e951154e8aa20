mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{FailingRetriever, StaticRetriever};
use omnifetch_core::{
    Params, RetrievalManager, RetrievalRequest, RetrieveError, RetrievedDocument,
};

fn static_doc(name: &str) -> Arc<StaticRetriever> {
    Arc::new(StaticRetriever::new(
        name,
        vec![RetrievedDocument::new(format!("{name} doc"), name, 1.0)],
    ))
}

#[tokio::test]
async fn retrieve_all_defaults_to_every_registered_provider() {
    let mut manager = RetrievalManager::new();
    manager.register(static_doc("a"));
    manager.register(static_doc("b"));

    let outcomes = manager.retrieve_all("query", None, None).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes["a"].is_ok());
    assert!(outcomes["b"].is_ok());
}

#[tokio::test]
async fn retrieve_all_isolates_partial_failure() {
    let mut manager = RetrievalManager::new();
    manager.register(static_doc("a"));
    manager.register(Arc::new(FailingRetriever::configuration("b")));
    manager.register(static_doc("c"));

    let outcomes = manager
        .retrieve_all("query", Some(&["a", "b", "c"]), None)
        .await;

    let mut keys: Vec<&str> = outcomes.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["a", "b", "c"]);

    assert!(outcomes["a"].is_ok());
    assert!(outcomes["c"].is_ok());
    assert!(matches!(
        outcomes["b"],
        Err(RetrieveError::Configuration(_))
    ));
}

#[tokio::test]
async fn retrieve_all_keeps_unknown_names_as_captured_errors() {
    let mut manager = RetrievalManager::new();
    manager.register(static_doc("a"));

    let outcomes = manager.retrieve_all("query", Some(&["a", "ghost"]), None).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes["a"].is_ok());
    match &outcomes["ghost"] {
        Err(RetrieveError::NotFound { name, .. }) => assert_eq!(name, "ghost"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn retrieve_all_applies_per_provider_params() {
    let mut manager = RetrievalManager::new();
    manager.register(Arc::new(StaticRetriever::echo("few", 10)));
    manager.register(Arc::new(StaticRetriever::echo("many", 10)));

    let mut kwargs_map = HashMap::new();
    kwargs_map.insert("few".to_string(), Params::new().with("top_k", 1));

    let outcomes = manager
        .retrieve_all("q", Some(&["few", "many"]), Some(&kwargs_map))
        .await;

    assert_eq!(outcomes["few"].as_ref().unwrap().documents.len(), 1);
    // No override for "many": default top_k applies.
    assert_eq!(outcomes["many"].as_ref().unwrap().documents.len(), 5);
}

#[tokio::test]
async fn retrieve_batch_is_positionally_aligned() {
    let mut manager = RetrievalManager::new();
    manager.register(static_doc("p1"));
    manager.register(Arc::new(FailingRetriever::provider("p2")));
    manager.register(static_doc("p3"));

    let outcomes = manager
        .retrieve_batch(vec![
            RetrievalRequest::new("p1", "q1"),
            RetrievalRequest::new("p2", "q2"),
            RetrievalRequest::new("p3", "q3"),
        ])
        .await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_ref().unwrap().provider, "p1");
    assert!(matches!(
        outcomes[1],
        Err(RetrieveError::Provider { .. })
    ));
    assert_eq!(outcomes[2].as_ref().unwrap().provider, "p3");
    assert_eq!(outcomes[2].as_ref().unwrap().query, "q3");
}

#[tokio::test]
async fn batch_requests_carry_their_own_params() {
    let mut manager = RetrievalManager::new();
    manager.register(Arc::new(StaticRetriever::echo("echo", 10)));

    let outcomes = manager
        .retrieve_batch(vec![
            RetrievalRequest::new("echo", "one").with_params(Params::new().with("top_k", 2)),
            RetrievalRequest::new("echo", "two"),
        ])
        .await;

    assert_eq!(outcomes[0].as_ref().unwrap().documents.len(), 2);
    assert_eq!(outcomes[1].as_ref().unwrap().documents.len(), 5);
}

#[tokio::test]
async fn dispatch_validation_errors_are_captured_not_raised() {
    let mut manager = RetrievalManager::new();
    manager.register(static_doc("a"));

    let outcomes = manager.retrieve_all("   ", Some(&["a"]), None).await;
    assert!(matches!(outcomes["a"], Err(RetrieveError::Validation(_))));

    let outcomes = manager
        .retrieve_batch(vec![RetrievalRequest::new("a", "")])
        .await;
    assert!(matches!(outcomes[0], Err(RetrieveError::Validation(_))));
}
