//! Integration tests for aggregate error flattening

use inputset::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn failing_form() -> AggregateValidationError {
    let mut form = InputSet::new([
        ("street", Field::required()),
        ("zip", Field::required().filter(filters::integer())),
    ]);
    form.parse([("zip", json!("abc"))]).unwrap_err()
}

#[test]
fn test_parse_errors_can_be_nested_under_a_parent_reference() {
    let address_errors = failing_form();
    assert_eq!(address_errors.references(), vec!["street", "zip"]);

    let mut order = AggregateValidationError::new();
    order.add_error(Message::required(), Some("customer"));
    order.add_error(address_errors.clone(), Some("shipping_address"));

    assert_eq!(order.len(), 3);
    assert_eq!(order.references(), vec!["customer", "shipping_address"]);
    let codes: Vec<_> = order
        .errors_for("shipping_address")
        .map(|e| e.code)
        .collect();
    assert_eq!(codes, vec![ErrorCode::Required, ErrorCode::TypeMismatch]);
    assert_eq!(order.constituents().len(), 1);
    assert_eq!(order.constituents()[0].entries(), address_errors.entries());
}

#[test]
fn test_flatten_without_reference_keeps_original_references() {
    let nested = failing_form();
    let mut outer = AggregateValidationError::new();
    outer.add_error(nested.clone(), None);

    assert_eq!(outer.entries(), nested.entries());
}

#[test]
fn test_flatten_concatenates_in_order() {
    let mut a = AggregateValidationError::new();
    a.add_error(Message::required(), Some("first"));
    let old_a = a.entries().to_vec();

    let b = failing_form();
    a.add_error(b.clone(), None);

    let expected: Vec<FieldError> = old_a.into_iter().chain(b.entries().to_vec()).collect();
    assert_eq!(a.entries(), expected.as_slice());
}

#[test]
fn test_repeated_flattening_is_idempotent() {
    let base = failing_form();

    let mut once = AggregateValidationError::new();
    once.add_error(base.clone(), None);
    let mut twice = AggregateValidationError::new();
    twice.add_error(once.clone(), None);

    assert_eq!(once.entries(), base.entries());
    assert_eq!(twice.entries(), once.entries());
    assert_eq!(twice.constituents()[0].constituents().len(), 1);
}

#[test]
fn test_messages_from_a_collaborator_as_json() {
    let remote = json!([
        {"code": "VALIDATION_FAILED", "key": "vat_number_checksum"},
        {"code": "VALIDATION_FAILED", "key": "string_too_long", "params": {"max": 12}}
    ]);
    let mut errors = AggregateValidationError::new();
    errors.add_error_value(&remote, Some("vat")).unwrap();

    let messages: Vec<_> = errors.entries().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Invalid value (vat_number_checksum)",
            "Must be at most 12 characters long"
        ]
    );
}

#[test]
fn test_invalid_argument_leaves_aggregate_unchanged() {
    let mut errors = AggregateValidationError::new();
    errors.add_error(Message::required(), Some("a"));

    let err = errors
        .add_error_value(&json!([{"code": "REQUIRED"}, {"code": "NOT_A_CODE"}]), Some("b"))
        .unwrap_err();

    assert_eq!(err.index, Some(1));
    assert_eq!(errors.len(), 1);
    let as_input: InputError = err.into();
    assert_eq!(as_input.error_code(), "INVALID_ARGUMENT");
}

#[test]
fn test_translator_applies_when_messages_are_added() {
    let translator = DefaultTranslator::new().with_template("required", "Obligatoire");
    let mut errors = AggregateValidationError::with_translator(Arc::new(translator));
    errors.add_error(vec![Message::required(), Message::required()], Some("x"));

    assert!(errors.entries().iter().all(|e| e.message == "Obligatoire"));
}

#[test]
fn test_flattened_entries_are_not_retranslated() {
    let english = failing_form();
    let translator = DefaultTranslator::new().with_template("required", "Obligatoire");
    let mut french = AggregateValidationError::with_translator(Arc::new(translator));
    french.add_error(english, None);

    assert_eq!(french.entries()[0].message, "This field is required");
}

#[test]
fn test_serialized_form_lists_every_entry() {
    let errors = failing_form();
    let value = serde_json::to_value(&errors).unwrap();

    assert_eq!(value["errors"].as_array().unwrap().len(), 2);
    assert_eq!(value["errors"][1]["field"], "zip");
    assert_eq!(value["errors"][1]["code"], "TYPE_MISMATCH");
    assert_eq!(value["errors"][1]["params"]["actual"], "string");
}
