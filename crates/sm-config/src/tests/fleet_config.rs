use crate::{ConfigError, build_fleet};

use std::path::Path;

use googletest::prelude::*;
use toml::Table;

fn parse(text: &str) -> Table {
    toml::from_str(text).unwrap()
}

#[test]
fn given_template_fields_when_building_then_declaration_order_kept() {
    // Given
    let templates = parse(
        r#"
        [imagix]
        path = "./image-server"
        "--zeta" = "z"
        "--alpha" = "a"
        "--middle" = "m"
        "#,
    );
    let servers = vec![parse(r#"name = "imagix1""#)];

    // When
    let fleet = build_fleet(&templates, &servers, Path::new("/srv")).unwrap();

    // Then
    let spec = fleet.resolve("imagix1").unwrap();
    let options: Vec<&str> = spec.options().map(|(k, _)| k).collect();
    assert_that!(options, eq(&vec!["--zeta", "--alpha", "--middle"]));
}

#[test]
fn given_scalar_values_when_building_then_rendered_as_strings() {
    // Given
    let templates = parse(
        r#"
        [mazox]
        path = "./maze"
        "--ratio" = 0.5
        "--fast" = true
        "#,
    );
    let servers = vec![parse(
        r#"
        name = "mazox1"
        "--port" = 20401
        "#,
    )];

    // When
    let fleet = build_fleet(&templates, &servers, Path::new("/srv")).unwrap();

    // Then
    let spec = fleet.resolve("mazox1").unwrap();
    assert_that!(spec.get("--ratio"), eq(Some("0.5")));
    assert_that!(spec.get("--fast"), eq(Some("true")));
    assert_that!(spec.get("--port"), eq(Some("20401")));
}

#[test]
fn given_array_value_when_building_then_fleet_error() {
    // Given
    let templates = parse(
        r#"
        [mazox]
        path = "./maze"
        "--list" = [1, 2]
        "#,
    );

    // When
    let result = build_fleet(&templates, &[], Path::new("/srv"));

    // Then
    let error = result.unwrap_err();
    assert_that!(error.key(), some(eq("templates.mazox.\"--list\"")));
    assert_that!(error.to_string(), contains_substring("--list"));
}

#[test]
fn given_server_without_name_when_building_then_error() {
    // Given
    let templates = parse("[mazox]\npath = \"./maze\"");
    let servers = vec![parse(r#""--port" = 20401"#)];

    // When
    let result = build_fleet(&templates, &servers, Path::new("/srv"));

    // Then
    assert!(matches!(result, Err(ConfigError::Fleet(_))));
}

#[test]
fn given_duplicate_servers_when_building_then_accepted_until_lookup() {
    // Given
    let templates = parse("[mazox]\npath = \"./maze\"");
    let servers = vec![parse(r#"name = "mazox1""#), parse(r#"name = "mazox1""#)];

    // When
    let fleet = build_fleet(&templates, &servers, Path::new("/srv")).unwrap();

    // Then
    assert_that!(fleet.entries().len(), eq(2));
    assert!(fleet.resolve("mazox1").unwrap_err().is_lookup_failure());
}
