//! Per-invocation identity and scratch paths.
//!
//! Every pipeline run gets a [`RequestId`]; intermediate files are named
//! after it, so two runs in the same working directory never write the same
//! scratch file.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Short hex identifier, unique per process invocation and call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Derive a fresh id from the process id, wall clock, and a process-wide
    /// counter, hashed and truncated to 12 hex digits.
    pub fn generate() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(b"request\0");
        hasher.update(std::process::id().to_le_bytes());
        hasher.update(nanos.to_le_bytes());
        hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..12].to_string())
    }

    /// Use a caller-chosen id (e.g. one supplied by a front end).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scratch PNG for the matted version of batch item `index` (1-based).
    pub fn scratch_path(&self, scratch_dir: &Path, index: usize) -> PathBuf {
        scratch_dir.join(format!("{}-{}.png", self.0, index))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where batch item `index` (1-based) of `total` is written.
///
/// A single-item batch writes to `output` exactly. Larger batches number
/// their items beside it: `output.jpg` → `output-1.jpg`, `output-2.jpg`, …
pub fn output_path_for(output: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}-{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}-{}", stem, index),
    };
    output.with_file_name(name)
}
