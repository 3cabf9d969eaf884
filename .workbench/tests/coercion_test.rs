// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! INI and dotenv scalar coercion, end to end through `load`/`parse_env`.

use snapconfig::{LoadOptions, Value};
use std::fs;
use tempfile::TempDir;

#[test]
fn ini_sections_and_types() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("app.ini");
    fs::write(
        &source,
        "[database]\nhost = localhost\nport = 5432\nenabled = true\n\n[cache]\ntype = redis\nttl = 3600\n",
    )
    .unwrap();

    let reader = snapconfig::load(&source, &LoadOptions::default()).unwrap();
    assert_eq!(reader.get("database.host").unwrap().as_str().unwrap(), "localhost");
    assert_eq!(reader.get("database.port").unwrap().as_int().unwrap(), 5432);
    assert_eq!(reader.get("database.enabled").unwrap().as_bool().unwrap(), true);
    assert_eq!(reader.get("cache.ttl").unwrap().as_int().unwrap(), 3600);
}

#[test]
fn ini_null_and_bool_variants_any_case() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("null.ini");
    fs::write(&source, "[section]\nempty =\nnil = nil\nTRUE = TRUE\nFalse = False\n").unwrap();

    let reader = snapconfig::load(&source, &LoadOptions::default()).unwrap();
    assert_eq!(reader.get("section.empty").unwrap().as_str().unwrap(), "");
    reader.get("section.nil").unwrap().as_null().unwrap();
    assert_eq!(reader.get("section.TRUE").unwrap().as_bool().unwrap(), true);
    assert_eq!(reader.get("section.False").unwrap().as_bool().unwrap(), false);
}

#[test]
fn dotenv_types_export_prefix_and_quotes() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join(".env");
    fs::write(
        &source,
        concat!(
            "# Database settings\n",
            "DATABASE_URL=postgres://localhost:5432/mydb\n",
            "DB_PORT=5432\n",
            "\n",
            "# Feature flags\n",
            "DEBUG=true\n",
            "VERBOSE=false\n",
            "\n",
            "API_KEY=\"sk-secret-key\"\n",
            "\n",
            "export EXPORTED_VAR=exported_value\n",
        ),
    )
    .unwrap();

    let text = fs::read_to_string(&source).unwrap();
    let value = snapconfig::parse_env(&text).unwrap();
    let entries = match value {
        Value::Object(entries) => entries.into_iter().collect::<std::collections::HashMap<_, _>>(),
        other => panic!("expected object, got {:?}", other),
    };

    assert_eq!(entries["DATABASE_URL"], Value::String("postgres://localhost:5432/mydb".to_string()));
    assert_eq!(entries["DB_PORT"], Value::Int(5432));
    assert_eq!(entries["DEBUG"], Value::Bool(true));
    assert_eq!(entries["VERBOSE"], Value::Bool(false));
    assert_eq!(entries["API_KEY"], Value::String("sk-secret-key".to_string()));
    assert_eq!(entries["EXPORTED_VAR"], Value::String("exported_value".to_string()));
}

#[test]
fn dotenv_null_variants() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join(".env");
    fs::write(&source, "A=nil\nB=null\nC=None\n").unwrap();

    let text = fs::read_to_string(&source).unwrap();
    let value = snapconfig::parse_env(&text).unwrap();
    match value {
        Value::Object(entries) => {
            let map: std::collections::HashMap<_, _> = entries.into_iter().collect();
            assert_eq!(map["A"], Value::Null);
            assert_eq!(map["B"], Value::Null);
            assert_eq!(map["C"], Value::Null);
        }
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn parse_env_does_not_touch_the_filesystem_cache() {
    let text = "KEY=value\nCOUNT=3\n";
    let value = snapconfig::parse_env(text).unwrap();
    match value {
        Value::Object(entries) => assert_eq!(entries.len(), 2),
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn load_env_returns_a_reader_over_the_dotenv_object() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join(".env");
    fs::write(&source, "KEY=value\nCOUNT=3\n").unwrap();

    let reader = snapconfig::load_env(&source).unwrap();
    assert_eq!(reader.key("KEY").unwrap().as_str().unwrap(), "value");
    assert_eq!(reader.key("COUNT").unwrap().as_int().unwrap(), 3);
}
