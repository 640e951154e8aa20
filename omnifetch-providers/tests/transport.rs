use omnifetch_core::{Params, RetrieveError, Retriever};
use omnifetch_providers::{parse_routes, Settings, TransportRetriever};
use serde_json::json;

#[test]
fn reads_routes_with_duration_and_distance() {
    let payload = json!({
        "routes": [
            {
                "summary": "Best Route",
                "legs": [
                    {"duration": {"text": "25 mins"}, "distance": {"text": "10 km"}}
                ]
            },
            {
                "name": "Coastal Road",
                "legs": [
                    {"duration": {"value": 2400}, "distance": "38 km"}
                ]
            }
        ]
    });

    let documents = parse_routes(&payload, 5);
    assert_eq!(documents.len(), 2);

    assert!(documents[0].content.contains("Best Route"));
    assert!(documents[0].content.contains("Duration: 25 mins"));
    assert!(documents[0].content.contains("Distance: 10 km"));
    assert_eq!(documents[0].score, 1.0);
    assert_eq!(documents[0].metadata["index"], 1);

    // `value`/bare-string fields are normalized too; rank decay applies.
    assert!(documents[1].content.contains("Coastal Road"));
    assert!(documents[1].content.contains("Duration: 2400"));
    assert!(documents[1].content.contains("Distance: 38 km"));
    assert_eq!(documents[1].score, 0.5);
}

#[test]
fn routes_without_summary_get_a_placeholder() {
    let payload = json!({"routes": [{"legs": []}]});
    let documents = parse_routes(&payload, 5);
    assert_eq!(documents[0].content, "Route 1");
}

#[test]
fn limit_is_honored() {
    let payload = json!({"routes": [{"summary": "A"}, {"summary": "B"}, {"summary": "C"}]});
    assert_eq!(parse_routes(&payload, 2).len(), 2);
}

#[tokio::test]
async fn missing_destination_is_a_validation_error() {
    let settings = Settings::builder().transport_api_key("demo").build();
    let retriever = TransportRetriever::new(&settings).unwrap();

    let err = retriever
        .retrieve("Central", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RetrieveError::Validation(_)));
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let settings = Settings::builder().build();
    let retriever = TransportRetriever::new(&settings).unwrap();

    let err = retriever
        .retrieve("Central", Params::new().with("destination", "HKUST"))
        .await
        .unwrap_err();
    assert!(matches!(err, RetrieveError::Configuration(_)));
}
