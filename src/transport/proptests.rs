//! Property-based tests for error normalization

use super::error::{ErrorDetail, RequestError};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_sub_error() -> impl Strategy<Value = Value> {
    "[a-z][a-z ]{0,15}".prop_map(|msg| json!({ "msg": msg, "type": "value_error" }))
}

proptest! {
    #[test]
    fn prop_display_is_never_empty(value in proptest::option::of(arb_json())) {
        let detail = ErrorDetail::from_value(value, "fallback");
        prop_assert!(!detail.display_message().trim().is_empty());
    }

    #[test]
    fn prop_any_status_and_body_is_renderable(status in 400u16..600, body in ".{0,40}") {
        let err = RequestError::from_response(status, &body);
        prop_assert!(!err.message().is_empty());
        prop_assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn prop_list_joins_in_order(items in proptest::collection::vec(arb_sub_error(), 1..5)) {
        let expected = items
            .iter()
            .map(|i| i["msg"].as_str().unwrap_or_default().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let body = json!({ "detail": items }).to_string();
        let detail = ErrorDetail::from_body(&body, "fallback");
        prop_assert_eq!(detail.display_message(), expected);
    }

    #[test]
    fn prop_normalization_is_deterministic(value in proptest::option::of(arb_json())) {
        let a = ErrorDetail::from_value(value.clone(), "fallback").display_message();
        let b = ErrorDetail::from_value(value, "fallback").display_message();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_empty_detail_falls_back_to_status(
        status in 400u16..600,
        detail in prop_oneof![
            Just(json!([])),
            Just(json!("")),
            Just(json!("   ")),
            Just(json!({})),
            Just(json!([{"msg": ""}])),
        ],
    ) {
        let body = json!({ "detail": detail }).to_string();
        let err = RequestError::from_response(status, &body);
        prop_assert_eq!(err.message(), format!("Request failed with status code {status}"));
    }
}
