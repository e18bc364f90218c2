use crate::Fields;
use crate::tests::fields;

use googletest::prelude::*;

#[test]
fn given_existing_key_when_set_then_value_replaced_in_place() {
    // Given
    let mut record = fields(&[("path", "./a"), ("--host", "h"), ("--port", "1")]);

    // When
    record.set("--host", "other");

    // Then
    let keys: Vec<&str> = record.keys().collect();
    assert_that!(keys, elements_are![eq(&"path"), eq(&"--host"), eq(&"--port")]);
    assert_that!(record.get("--host"), some(eq("other")));
}

#[test]
fn given_new_key_when_set_then_appended() {
    // Given
    let mut record = fields(&[("path", "./a")]);

    // When
    record.set("--port", "20101");

    // Then
    assert_that!(record.len(), eq(2));
    assert_that!(record.keys().last(), some(eq("--port")));
}

#[test]
fn given_template_and_overrides_when_merged_then_overrides_win_and_order_kept() {
    // Given
    let template = fields(&[("path", "./srv"), ("--host", "127.0.0.1"), ("--port", "1")]);
    let overrides = fields(&[("name", "srv1"), ("--port", "20101")]);

    // When
    let merged = template.merged_with(&overrides);

    // Then
    let pairs: Vec<(&str, &str)> = merged.iter().collect();
    assert_that!(
        pairs,
        elements_are![
            eq(&("path", "./srv")),
            eq(&("--host", "127.0.0.1")),
            eq(&("--port", "20101")),
            eq(&("name", "srv1")),
        ]
    );
}

#[test]
fn given_mixed_fields_when_options_then_only_double_dash_keys() {
    // Given
    let record = fields(&[
        ("path", "./srv"),
        ("--host", "h"),
        ("#port", "7"),
        ("--port", "8"),
    ]);

    // When
    let options: Vec<&str> = record.options().map(|(k, _)| k).collect();

    // Then
    assert_that!(options, elements_are![eq(&"--host"), eq(&"--port")]);
}

#[test]
fn given_empty_record_when_checked_then_empty() {
    let record = Fields::new();

    assert_that!(record.is_empty(), eq(true));
    assert_that!(record.get("path"), none());
}
