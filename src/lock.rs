// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Optional advisory file lock for callers who want a best-effort
//! single-writer guarantee across processes. The core [`crate::loader`]
//! never takes this lock — concurrent compiles are already safe via the
//! Writer's unique temp names plus atomic rename — this exists purely as
//! an opt-in convenience for callers who'd rather serialize recompiles
//! than let the fastest writer win.

use crate::error::{SnapError, SnapResult};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Holds an advisory exclusive lock on `<source>.lock` until dropped.
pub struct AdvisoryLock {
    file: File,
    path: PathBuf,
}

impl Drop for AdvisoryLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Blocks (polling every 100ms) until an exclusive advisory lock on
/// `source`'s sidecar lock file is acquired, or `timeout` elapses.
pub fn acquire(source: &Path, timeout: Duration) -> SnapResult<AdvisoryLock> {
    let lock_path = lock_path_for(source);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(&lock_path)
        .map_err(|e| SnapError::IoError {
            operation: format!("open {}", lock_path.display()),
            reason: e.to_string(),
        })?;

    let start = Instant::now();
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => {
                return Ok(AdvisoryLock {
                    file,
                    path: lock_path,
                })
            }
            Err(_) if start.elapsed() < timeout => {
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                return Err(SnapError::IoError {
                    operation: format!("lock {}", lock_path.display()),
                    reason: format!("timed out after {:?}: {}", timeout, e),
                })
            }
        }
    }
}

fn lock_path_for(source: &Path) -> PathBuf {
    let mut name = source.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    source.with_file_name(name)
}
