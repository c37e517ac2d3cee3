//! Train route endpoint tests.

use chrono::DateTime;
use tracker_client::Error;
use tracker_tests::spawn_test_server;

#[tokio::test]
async fn test_list_routes() {
    let server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    let routes = client.list_routes().await.expect("Failed to list routes");

    assert_eq!(routes.len(), 11);
    let paris_lyon = routes
        .iter()
        .find(|r| r.id == "PARIS-LYON")
        .expect("PARIS-LYON missing");
    assert_eq!(paris_lyon.from, "PARIS");
    assert_eq!(paris_lyon.to, "LYON");
    assert_eq!(paris_lyon.peak, Some(120.0));
}

#[tokio::test]
async fn test_get_train_is_case_insensitive() {
    let server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    let lower = client.get_train("paris-lyon").await.expect("Failed to get route");
    let upper = client.get_train("PARIS-LYON").await.expect("Failed to get route");

    assert_eq!(lower.route, "PARIS-LYON");
    assert_eq!(lower, upper);
}

#[tokio::test]
async fn test_get_train_summary_fields() {
    let server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    let fare = client.get_train("PARIS-LYON").await.expect("Failed to get route");
    let summary = &fare.summary;
    let history = &summary.history;

    assert_eq!(history.len(), 50);
    assert_eq!(summary.current, history[49].price);
    assert_eq!(summary.open, Some(history[0].price));
    assert!((summary.change - (history[49].price - history[48].price)).abs() < 1e-6);
    assert!(summary.low <= summary.current && summary.current <= summary.high);
    assert!(history.iter().all(|p| p.price >= 18.0));

    let times: Vec<_> = history
        .iter()
        .map(|p| DateTime::parse_from_rfc3339(&p.time).expect("Invalid timestamp"))
        .collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_get_train_unknown_route() {
    let server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    let result = client.get_train("UNKNOWN-ROUTE").await;

    match result {
        Err(Error::NotFound(message)) => assert_eq!(message, "Route not found"),
        other => panic!("Expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_trains_batch() {
    let server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    let batch = client.get_trains_batch().await.expect("Failed to get batch");

    assert_eq!(batch.len(), 11);
    for (route, summary) in &batch {
        assert_eq!(summary.history.len(), 50, "route {}", route);
        assert_eq!(summary.open, Some(summary.history[0].price));
    }
}

#[tokio::test]
async fn test_reads_are_stable_between_ticks() {
    let mut server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    let first = client.get_train("PARIS-NICE").await.expect("Failed to get route");
    let second = client.get_train("PARIS-NICE").await.expect("Failed to get route");
    assert_eq!(first, second);

    let report = server.tick();
    assert_eq!(report.appended, 21);

    let after = client.get_train("PARIS-NICE").await.expect("Failed to get route");
    assert_eq!(after.summary.history.len(), 51);
    assert_eq!(after.summary.history[..50], first.summary.history[..]);
}

#[tokio::test]
async fn test_history_is_capped() {
    let mut server = spawn_test_server().await.expect("Failed to start server");
    let client = server.client().expect("Failed to create client");

    for _ in 0..160 {
        server.tick();
    }

    let fare = client.get_train("LYON-MARSEILLE").await.expect("Failed to get route");
    assert_eq!(fare.summary.history.len(), 200);
    assert_eq!(fare.summary.open, Some(fare.summary.history[0].price));
}
