// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Freshness determinism: a second `load` of an untouched source reuses
//! the cached image; editing the source invalidates it; `force_recompile`
//! bypasses the check outright.

use snapconfig::LoadOptions;
use std::fs;
use std::thread::sleep;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn second_load_reuses_a_fresh_image() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{"a": 1}"#).unwrap();

    snapconfig::load(&source, &LoadOptions::default()).unwrap();
    let image_path = snapconfig::default_image_path(&source);
    let compiled_at = fs::metadata(&image_path).unwrap().modified().unwrap();

    sleep(Duration::from_millis(20));
    snapconfig::load(&source, &LoadOptions::default()).unwrap();
    let still = fs::metadata(&image_path).unwrap().modified().unwrap();
    assert_eq!(compiled_at, still, "image should not have been rewritten");
}

#[test]
fn editing_the_source_invalidates_the_cached_image() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{"a": 1}"#).unwrap();
    snapconfig::load(&source, &LoadOptions::default()).unwrap();

    sleep(Duration::from_millis(20));
    fs::write(&source, r#"{"a": 2}"#).unwrap();

    let reader = snapconfig::load(&source, &LoadOptions::default()).unwrap();
    assert_eq!(reader.key("a").unwrap().as_int().unwrap(), 2);
}

#[test]
fn force_recompile_ignores_a_fresh_image() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{"a": 1}"#).unwrap();
    snapconfig::load(&source, &LoadOptions::default()).unwrap();

    let options = LoadOptions {
        force_recompile: true,
        ..Default::default()
    };
    let reader = snapconfig::load(&source, &options).unwrap();
    assert_eq!(reader.key("a").unwrap().as_int().unwrap(), 1);
}

#[test]
fn cache_info_reports_existence_and_freshness() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{}"#).unwrap();

    let info = snapconfig::cache_info(&source).unwrap();
    assert!(info.source_exists);
    assert!(!info.exists);
    assert!(!info.fresh);
    assert_eq!(info.image_size, 0);

    snapconfig::load(&source, &LoadOptions::default()).unwrap();
    let info = snapconfig::cache_info(&source).unwrap();
    assert!(info.source_exists);
    assert!(info.exists);
    assert!(info.fresh);
    assert!(info.image_size > 0);

    sleep(Duration::from_millis(20));
    fs::write(&source, r#"{"changed": true}"#).unwrap();
    let info = snapconfig::cache_info(&source).unwrap();
    assert!(info.exists);
    assert!(!info.fresh);
}

#[test]
fn cache_info_reports_source_missing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("missing.json");

    let info = snapconfig::cache_info(&source).unwrap();
    assert!(!info.source_exists);
    assert!(!info.exists);
    assert!(!info.fresh);
    assert_eq!(info.image_size, 0);
}
