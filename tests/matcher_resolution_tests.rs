use std::sync::Arc;
use validation_matchers::*;
mod test_utils;
use test_utils::*;

/// End-to-end resolution of matcher expressions through the registry

#[test]
fn test_matches_expression_passes_and_fails() {
    init_logging();
    let mut context = TestContext::new();

    assert!(ValidationMatcherUtils::resolve_validation_matcher("orderId", "123", "matches('[0-9]+')", &mut context).is_ok());

    let error = ValidationMatcherUtils::resolve_validation_matcher("orderId", "abc", "matches('[0-9]+')", &mut context)
        .unwrap_err();
    assert!(error.is_validation_failure());
    let message = error.to_string();
    assert!(message.contains("orderId"));
    assert!(message.contains("abc"));
    assert!(message.contains("[0-9]+"));
}

#[test]
fn test_unregistered_prefix() {
    let mut context = TestContext::new();
    let error = ValidationMatcherUtils::resolve_validation_matcher("count", "5", "myLib:between('1','10')", &mut context)
        .unwrap_err();

    assert_eq!(
        error,
        MatcherError::NoSuchLibrary {
            prefix: "myLib:".to_string()
        }
    );
    assert_eq!(error.kind(), ErrorCategory::Configuration);
}

#[test]
fn test_bare_ignore_always_passes() {
    let mut context = TestContext::new();
    for value in ["", "anything", "null", "@ignore@"] {
        assert!(ValidationMatcherUtils::resolve_validation_matcher("field", value, "ignore", &mut context).is_ok());
        assert!(ValidationMatcherUtils::resolve_validation_matcher("field", value, "@ignore@", &mut context).is_ok());
    }
}

#[test]
fn test_date_range_with_pattern() {
    let mut context = TestContext::new();
    let expression = "dateRange('2020-01-01','2020-12-31','yyyy-MM-dd')";

    assert!(ValidationMatcherUtils::resolve_validation_matcher("date", "2020-06-15", expression, &mut context).is_ok());
    let error = ValidationMatcherUtils::resolve_validation_matcher("date", "2021-01-01", expression, &mut context)
        .unwrap_err();
    assert!(error.is_validation_failure());
}

#[test]
fn test_prefix_selects_library() {
    let check_a = RecordingMatcher::new("check");
    let check_b = RecordingMatcher::new("check");

    let mut context = context_with_libraries(vec![
        ValidationMatcherLibrary::new("libraryA", "a:").with_matcher("check", check_a.clone()),
        ValidationMatcherLibrary::new("libraryB", "b:").with_matcher("check", check_b.clone()),
    ]);

    assert!(ValidationMatcherUtils::resolve_validation_matcher("field", "x", "a:check('x')", &mut context).is_ok());
    assert_eq!(check_a.call_count(), 1);
    assert_eq!(check_b.call_count(), 0);

    assert!(ValidationMatcherUtils::resolve_validation_matcher("field", "x", "@b:check('x')@", &mut context).is_ok());
    assert_eq!(check_a.call_count(), 1);
    assert_eq!(check_b.call_count(), 1);
}

#[test]
fn test_unknown_matcher_in_known_library() {
    let mut context = TestContext::new();
    let error = ValidationMatcherUtils::resolve_validation_matcher("field", "x", "@noSuchMatcher('x')@", &mut context)
        .unwrap_err();
    assert!(matches!(error, MatcherError::NoSuchMatcher { ref name, .. } if name == "noSuchMatcher"));
}

#[test]
fn test_missing_function_body() {
    let mut context = TestContext::new();
    let error = ValidationMatcherUtils::resolve_validation_matcher("field", "x", "@contains@", &mut context).unwrap_err();
    assert_eq!(error.code(), "MISSING_FUNCTION_BODY");
}

#[test]
fn test_unmatched_delimiter() {
    let mut context = TestContext::new();
    let error = ValidationMatcherUtils::resolve_validation_matcher("field", "x", "@contains('abc)@", &mut context)
        .unwrap_err();
    assert!(matches!(error, MatcherError::UnmatchedDelimiter { delimiter: '\'', position: 0, .. }));
}

#[test]
fn test_variable_wrapped_expression() {
    let mut context = TestContext::new();
    assert!(ValidationMatcherUtils::resolve_validation_matcher("field", "Hello", "${@startsWith('He')@}", &mut context).is_ok());
}

#[test]
fn test_parameters_receive_variables_and_functions() {
    let recorder = RecordingMatcher::new("echo");
    let mut context = context_with_libraries(vec![
        ValidationMatcherLibrary::new("recording", "rec:").with_matcher("echo", recorder.clone()),
    ]);
    context.set_variable("user", "alice").unwrap();

    let result = ValidationMatcherUtils::resolve_validation_matcher(
        "name",
        "ALICE",
        "@rec:echo('core:upperCase(${user})','${user}')@",
        &mut context,
    );

    assert!(result.is_ok());
    assert_eq!(recorder.last_parameters().unwrap(), params(&["ALICE", "alice"]));
}

#[test]
fn test_delimiter_inside_value() {
    let recorder = RecordingMatcher::new("echo");
    let mut context = context_with_libraries(vec![
        ValidationMatcherLibrary::new("recording", "rec:").with_matcher("echo", recorder.clone()),
    ]);

    assert!(ValidationMatcherUtils::resolve_validation_matcher("text", "it's", "rec:echo('it's')", &mut context).is_ok());
    assert_eq!(recorder.last_parameters().unwrap(), params(&["it's"]));
}

#[test]
fn test_matcher_with_own_parser() {
    let mut context = TestContext::new();
    assert!(ValidationMatcherUtils::resolve_validation_matcher(
        "text",
        "abcz",
        "@assertThat(allOf(startsWith(a), endsWith(z)))@",
        &mut context,
    )
    .is_ok());

    let error = ValidationMatcherUtils::resolve_validation_matcher(
        "text",
        "abc",
        "@assertThat(allOf(startsWith(a), endsWith(z)))@",
        &mut context,
    )
    .unwrap_err();
    assert!(error.is_validation_failure());
}

#[test]
fn test_assert_that_with_explicit_value() {
    let mut context = TestContext::new();
    context.set_variable("status", "ACTIVE").unwrap();

    assert!(ValidationMatcherUtils::resolve_validation_matcher(
        "ignored",
        "whatever",
        "@assertThat('${status}', equalToIgnoringCase(active))@",
        &mut context,
    )
    .is_ok());
}

#[test]
fn test_assert_that_without_value_before_separator_is_configuration_error() {
    let mut context = TestContext::new();
    let error =
        ValidationMatcherUtils::resolve_validation_matcher("f", "x", "@assertThat(',equalTo(x))@", &mut context)
            .unwrap_err();
    assert!(matches!(error, MatcherError::InvalidParameter { .. }));
    assert!(!error.is_validation_failure());
}

#[test]
fn test_assert_that_with_path_matcher() {
    let mut context = TestContext::new();
    assert!(ValidationMatcherUtils::resolve_validation_matcher(
        "path",
        "value/12345",
        "@assertThat(matchesPath(value/{id}))@",
        &mut context,
    )
    .is_ok());

    let error = ValidationMatcherUtils::resolve_validation_matcher(
        "path",
        "value/12345/test",
        "@assertThat(matchesPath(value/{id}))@",
        &mut context,
    )
    .unwrap_err();
    assert!(error.is_validation_failure());
}

#[test]
fn test_variable_matcher_stores_value() {
    let mut context = TestContext::new();
    ValidationMatcherUtils::resolve_validation_matcher("orderId", "4711", "@variable('id')@", &mut context).unwrap();
    ValidationMatcherUtils::resolve_validation_matcher("customer", "c-1", "@variable()@", &mut context).unwrap();

    assert_eq!(context.get_variable("id").unwrap(), "4711");
    assert_eq!(context.get_variable("customer").unwrap(), "c-1");
    assert!(ValidationMatcherUtils::resolve_validation_matcher("copy", "4711", "@contains('${id}')@", &mut context).is_ok());
}

#[test]
fn test_custom_markers() {
    let mut settings = MatcherSettings::strict();
    settings.default_date_format = "yyyy-MM-dd".to_string();
    let mut context = TestContext::with_settings(settings);

    assert!(ValidationMatcherUtils::resolve_validation_matcher("id", "42", "@@isNumber()@@", &mut context).is_ok());
    assert!(!ValidationMatcherUtils::is_validation_matcher_expression("@isNumber()@", context.settings()));
}

#[test]
fn test_custom_delimiter() {
    let mut settings = MatcherSettings::default();
    settings.default_delimiter = '"';
    let mut context = TestContext::with_settings(settings);

    assert!(ValidationMatcherUtils::resolve_validation_matcher("text", "it's here", "@contains(\"it's\")@", &mut context).is_ok());
}

#[test]
fn test_standard_matchers_through_expressions() {
    let mut context = TestContext::new();
    let cases = [
        ("Hello World", "@equalsIgnoreCase('hello world')@"),
        ("Hello World", "@containsIgnoreCase('WORLD')@"),
        ("Hello World", "@endsWith('World')@"),
        ("  padded ", "@trim('padded')@"),
        ("a b c", "@trimAllWhitespaces('abc')@"),
        ("12345", "@stringLength('5')@"),
        ("", "@empty()@"),
        ("x", "@notEmpty()@"),
        ("null", "@null()@"),
        ("x", "@notNull()@"),
        ("2020-06-15", "@matchesDatePattern('yyyy-MM-dd')@"),
        ("10", "@greaterThan('9')@"),
        ("8", "@lowerThan('9')@"),
        ("15.06.2020", "@isWeekday('MONDAY')@"),
        ("15-06-2020", "@dateRange('01-06-2020','30-06-2020')@"),
    ];

    for (value, expression) in cases {
        assert!(
            ValidationMatcherUtils::resolve_validation_matcher("field", value, expression, &mut context).is_ok(),
            "{} should accept '{}'",
            expression,
            value
        );
    }
}

#[test]
fn test_registry_shared_instances() {
    let context = TestContext::new();
    let library = context.validation_matcher_registry().get_library_for_prefix("").unwrap();
    let first = library.get_validation_matcher("matches").unwrap();
    let second = library.get_validation_matcher("matches").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
