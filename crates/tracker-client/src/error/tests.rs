//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 500,
        message: "Internal server error".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal server error"));
}

#[test]
fn test_not_found_error_display() {
    let error = Error::NotFound("Route not found".to_string());

    let display = format!("{}", error);
    assert!(display.contains("Not found"));
    assert!(display.contains("Route not found"));
}

#[test]
fn test_invalid_url_from_parse_error() {
    let parse_err = url::Url::parse("not a url").unwrap_err();
    let error: Error = parse_err.into();

    assert!(matches!(error, Error::InvalidUrl(_)));
    assert!(format!("{}", error).starts_with("Invalid URL"));
}

#[test]
fn test_json_error_from_serde() {
    let serde_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
    let error: Error = serde_err.into();

    assert!(matches!(error, Error::Json(_)));
}
