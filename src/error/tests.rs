//! Unit tests for error module.

use super::*;

// ============================================================================
// ErrorResponse Tests
// ============================================================================

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Route not found".to_string(),
        code: "ROUTE_NOT_FOUND".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"error\":\"Route not found\""));
    assert!(json.contains("\"code\":\"ROUTE_NOT_FOUND\""));
}

// ============================================================================
// EngineError Display Tests
// ============================================================================

#[test]
fn test_engine_error_not_found_display() {
    let error = EngineError::NotFound {
        catalog: Catalog::Routes,
        key: "PARIS-BREST".to_string(),
    };
    assert_eq!(
        format!("{}", error),
        "instrument not found in routes: PARIS-BREST"
    );
}

#[test]
fn test_engine_error_backfill_display() {
    let error = EngineError::BackfillOutOfRange("step of 0s".to_string());
    assert_eq!(format!("{}", error), "backfill out of range: step of 0s");
}

#[test]
fn test_engine_error_already_seeded_display() {
    let error = EngineError::AlreadySeeded {
        catalog: Catalog::Products,
        key: "RTX 4090".to_string(),
    };
    assert_eq!(
        format!("{}", error),
        "series already seeded in products: RTX 4090"
    );
}

#[test]
fn test_engine_error_empty_series_display() {
    let error = EngineError::EmptySeries("PARIS-LYON".to_string());
    assert_eq!(format!("{}", error), "empty series: PARIS-LYON");
}

#[test]
fn test_engine_error_out_of_order_display() {
    let error = EngineError::OutOfOrder("PARIS-LYON".to_string());
    assert_eq!(format!("{}", error), "sample out of order for PARIS-LYON");
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_route_not_found_display() {
    let error = ApiError::RouteNotFound("UNKNOWN-ROUTE".to_string());
    assert_eq!(format!("{}", error), "Route not found");
}

#[test]
fn test_api_error_product_not_found_display() {
    let error = ApiError::ProductNotFound("GTX 480".to_string());
    assert_eq!(format!("{}", error), "Product not found");
}

#[test]
fn test_api_error_internal_display() {
    let error = ApiError::Internal("empty series: A-B".to_string());
    assert_eq!(
        format!("{}", error),
        "Internal server error: empty series: A-B"
    );
}

// ============================================================================
// ApiError Conversion Tests
// ============================================================================

#[test]
fn test_engine_not_found_maps_by_catalog() {
    let route: ApiError = EngineError::NotFound {
        catalog: Catalog::Routes,
        key: "X-Y".to_string(),
    }
    .into();
    assert!(matches!(route, ApiError::RouteNotFound(ref key) if key == "X-Y"));

    let product: ApiError = EngineError::NotFound {
        catalog: Catalog::Products,
        key: "Z".to_string(),
    }
    .into();
    assert!(matches!(product, ApiError::ProductNotFound(ref key) if key == "Z"));
}

#[test]
fn test_engine_misuse_maps_to_internal() {
    let error: ApiError = EngineError::OutOfOrder("A-B".to_string()).into();
    assert!(matches!(error, ApiError::Internal(_)));
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[test]
fn test_api_error_route_not_found_into_response() {
    let error = ApiError::RouteNotFound("UNKNOWN-ROUTE".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_product_not_found_into_response() {
    let error = ApiError::ProductNotFound("GTX 480".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_api_error_internal_into_response() {
    let error = ApiError::Internal("Server error".to_string());
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_api_error_body() {
    let response = ApiError::RouteNotFound("UNKNOWN-ROUTE".to_string()).into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}
