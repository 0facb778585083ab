// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn kind_from_status_maps_auth_statuses() {
    assert_eq!(ErrorKind::from_status(401), ErrorKind::Auth);
    assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
    assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
    assert_eq!(ErrorKind::from_status(400), ErrorKind::Unknown);
    assert_eq!(ErrorKind::from_status(500), ErrorKind::Unknown);
}

#[test]
fn connectivity_uses_the_fixed_message() {
    let err = ApiError::connectivity();
    assert_eq!(err.kind, ErrorKind::Connectivity);
    assert_eq!(err.message, CONNECT_MESSAGE);
    assert!(err.fields.is_empty());
}

#[test]
fn validation_takes_message_from_first_field() {
    let err = ApiError::validation(vec![
        FieldError::new("email", "Email is required"),
        FieldError::new("password", "Password is required"),
    ]);
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Email is required");
    assert_eq!(err.field("password"), Some("Password is required"));
    assert_eq!(err.field("phone"), None);
}

#[test]
fn validation_with_no_fields_falls_back_to_generic() {
    let err = ApiError::validation(Vec::new());
    assert_eq!(err.message, GENERIC_MESSAGE);
}

#[test]
fn display_includes_kind_and_message() {
    let err = ApiError::new(ErrorKind::NotFound, "no such product");
    assert_eq!(err.to_string(), "NOT_FOUND: no such product");
}

#[test]
fn kinds_round_trip_through_serde() {
    let json = serde_json::to_string(&ErrorKind::Forbidden).expect("serialize");
    assert_eq!(json, "\"forbidden\"");
    let kind: ErrorKind = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(kind, ErrorKind::Forbidden);
}
