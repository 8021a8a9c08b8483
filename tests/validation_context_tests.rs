use std::collections::HashMap;
use validation_matchers::*;
mod test_utils;
use test_utils::*;

/// Validation status handling and whole-message field validation

const ALL_STATUSES: [ValidationStatus; 4] = [
    ValidationStatus::Unknown,
    ValidationStatus::Optional,
    ValidationStatus::Passed,
    ValidationStatus::Failed,
];

#[test]
fn test_failed_status_is_final() {
    for before in ALL_STATUSES {
        for after in ALL_STATUSES {
            let mut context = ValidationContext::new();
            context.update_status(before);
            context.update_status(ValidationStatus::Failed);
            context.update_status(after);
            assert_eq!(context.status(), ValidationStatus::Failed, "{} then FAILED then {}", before, after);
        }
    }
}

#[test]
fn test_status_serialization() {
    assert_eq!(serde_json::to_string(&ValidationStatus::Passed).unwrap(), "\"PASSED\"");
    assert_eq!(
        serde_json::from_str::<ValidationStatus>("\"OPTIONAL\"").unwrap(),
        ValidationStatus::Optional
    );
}

fn fields(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_field_validation_mixed_controls() {
    init_logging();
    let mut context = TestContext::new();
    context.set_variable("customer", "c-42").unwrap();
    let mut validation_context = ValidationContext::new();

    let received = fields(&[
        ("orderId", "4711"),
        ("customer", "c-42"),
        ("created", "2020-06-15"),
        ("note", "anything at all"),
    ]);
    let control = fields(&[
        ("orderId", "@matches('[0-9]{4}')@"),
        ("customer", "${customer}"),
        ("created", "@dateRange('2020-01-01','2020-12-31','yyyy-MM-dd')@"),
        ("note", "@ignore@"),
    ]);

    let result = FieldValidator::validate_fields(&received, &control, &mut context, &mut validation_context).unwrap();
    assert!(result.valid, "{:?}", result.errors);
    assert_eq!(result.fields_validated, 4);
    assert_eq!(validation_context.status(), ValidationStatus::Passed);
}

#[test]
fn test_field_validation_failure_keeps_context_failed() {
    let mut context = TestContext::new();
    let mut validation_context = ValidationContext::new();

    let result = FieldValidator::validate_fields(
        &fields(&[("id", "abc")]),
        &fields(&[("id", "@isNumber()@")]),
        &mut context,
        &mut validation_context,
    )
    .unwrap();
    assert!(!result.valid);
    assert_eq!(result.errors[0].field, "id");

    // a later successful step does not hide the failure
    FieldValidator::validate_fields(
        &fields(&[("id", "1")]),
        &fields(&[("id", "@isNumber()@")]),
        &mut context,
        &mut validation_context,
    )
    .unwrap();
    assert_eq!(validation_context.status(), ValidationStatus::Failed);
}

#[test]
fn test_field_validation_result_serializes() {
    let mut validation_context = ValidationContext::new();
    let result = FieldValidator::validate_fields(
        &fields(&[("a", "1")]),
        &fields(&[("a", "2")]),
        &mut TestContext::new(),
        &mut validation_context,
    )
    .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"][0]["field"], "a");
    assert_eq!(json["errors"][0]["expected"][0], "2");
}
