// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Concurrency: many readers sharing one mapped image, and many writers
//! racing to compile the same source, both without tearing a reader's
//! view of the bytes.

use snapconfig::LoadOptions;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

#[test]
fn many_readers_share_one_mapping_without_corruption() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{"a": 1, "list": [1, 2, 3, 4, 5]}"#).unwrap();
    let reader = snapconfig::load(&*source, &LoadOptions::default()).unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let reader = reader.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..200 {
                assert_eq!(reader.key("a").unwrap().as_int().unwrap(), 1);
                let list = reader.key("list").unwrap();
                assert_eq!(list.len().unwrap(), 5);
                assert_eq!(list.index(4).unwrap().as_int().unwrap(), 5);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("reader thread panicked");
    }
}

#[test]
fn concurrent_loads_of_the_same_source_all_converge() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{"a": 1}"#).unwrap();

    let barrier = Arc::new(Barrier::new(8));
    let source = Arc::new(source);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let barrier = Arc::clone(&barrier);
        let source = Arc::clone(&source);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let reader = snapconfig::load(&*source, &LoadOptions::default()).unwrap();
            assert_eq!(reader.key("a").unwrap().as_int().unwrap(), 1);
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let reader = snapconfig::load(&*source, &LoadOptions::default()).unwrap();
    assert_eq!(reader.key("a").unwrap().as_int().unwrap(), 1);
}

#[test]
fn no_deadlock_mixing_reads_and_recompiles() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.json");
    fs::write(&source, r#"{"n": 0}"#).unwrap();
    let source = Arc::new(source);

    let timeout = std::time::Duration::from_secs(10);
    let start = std::time::Instant::now();

    let writer_source = Arc::clone(&source);
    let writer = thread::spawn(move || {
        for n in 0..20 {
            fs::write(&*writer_source, format!(r#"{{"n": {}}}"#, n)).unwrap();
            let options = snapconfig::LoadOptions {
                force_recompile: true,
                ..Default::default()
            };
            snapconfig::load(&*writer_source, &options).unwrap();
        }
    });

    let mut handles = vec![writer];
    for _ in 0..4 {
        let reader_source = Arc::clone(&source);
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                let _ = snapconfig::load(&*reader_source, &LoadOptions::default());
            }
        }));
    }

    for handle in handles {
        assert!(start.elapsed() < timeout, "possible deadlock");
        handle.join().expect("thread panicked");
    }
}
