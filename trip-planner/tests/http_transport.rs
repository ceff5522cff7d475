//! Integration tests for the HTTP transport using WireMock.

use serde_json::json;
use trip_planner::tfnsw::{
    ApiTransport, Endpoint, HttpTransport, TripPlanner, TripPlannerConfig, TripPlannerError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn transport(server: &MockServer) -> HttpTransport {
    let config = TripPlannerConfig::new("test-key")
        .with_base_url(format!("{}/v1/tp", server.uri()))
        .with_timeout(5);
    HttpTransport::new(config).expect("valid config")
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn sends_auth_and_common_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tp/stop_finder"))
        .and(header("Authorization", "apikey test-key"))
        .and(query_param("outputFormat", "rapidJSON"))
        .and(query_param("coordOutputFormat", "EPSG:4326"))
        .and(query_param("name_sf", "Circular Quay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "10.2.1.42",
            "locations": [
                { "id": "10101331", "name": "Circular Quay Station", "type": "stop" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = transport(&server)
        .get(Endpoint::StopFinder, &[("name_sf", "Circular Quay".to_string())])
        .await
        .unwrap();

    assert_eq!(value["locations"][0]["id"], "10101331");
}

#[tokio::test]
async fn planner_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tp/stop_finder"))
        .and(query_param("type_sf", "any"))
        .and(query_param("anyMaxSizeHitList", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [
                { "id": "10101331", "name": "Circular Quay Station", "type": "stop" },
                { "id": "10101100", "name": "Central Station", "type": "stop" }
            ]
        })))
        .mount(&server)
        .await;

    let planner = TripPlanner::with_transport(transport(&server));
    let best = planner.best_stop("Circular Quay").await.unwrap().unwrap();

    assert_eq!(best.id, "10101331");
    assert!(best.is_best);
}

// =============================================================================
// Error handling
// =============================================================================

#[tokio::test]
async fn non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tp/trip"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .get(Endpoint::Trip, &[])
        .await
        .unwrap_err();

    match err {
        TripPlannerError::Api { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_object_in_ok_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tp/departure_mon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "10.2.1.42",
            "error": { "message": "stop invalid", "versions": {} }
        })))
        .mount(&server)
        .await;

    let err = transport(&server)
        .get(Endpoint::DepartureMon, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, TripPlannerError::Api { status: None, ref message } if message == "stop invalid"));
}

#[tokio::test]
async fn invalid_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tp/add_info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .get(Endpoint::AddInfo, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, TripPlannerError::Api { status: None, .. }));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Nothing listens on port 1
    let config = TripPlannerConfig::new("test-key").with_base_url("http://127.0.0.1:1/v1/tp");
    let err = HttpTransport::new(config)
        .unwrap()
        .get(Endpoint::Coord, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, TripPlannerError::Network(_)));
}
