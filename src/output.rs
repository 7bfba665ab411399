//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Make
//!
//! ```text
//! 001 portrait.png
//!     Output: output-1.jpg
//! 002 group.jpg
//!     No face detected
//! 003 missing.png
//!     Failed: File not found: original/missing.png
//!
//! Finished 1 of 3 photos
//! ```
//!
//! ## List
//!
//! ```text
//! Photos (original/)
//!     001 portrait.png
//!     002 wide.jpg
//!
//! Backgrounds (bg/)
//!     001 blue.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::pipeline::{PipelineOutcome, ProcessEvent};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// make
// ============================================================================

/// Format a single pipeline progress event as display lines.
///
/// `ItemStarted` produces the item header; the other events add an indented
/// status line beneath it.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ItemStarted { index, input, .. } => {
            vec![format!("{} {}", format_index(*index), input)]
        }
        ProcessEvent::ItemFinished { output, .. } => {
            vec![format!("{}Output: {}", indent(1), output.display())]
        }
        ProcessEvent::ItemFailed { message, .. } => {
            vec![format!("{}Failed: {}", indent(1), message)]
        }
        ProcessEvent::NoFace { .. } => vec![format!("{}No face detected", indent(1))],
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Format the summary printed after a batch.
pub fn format_outcome(outcome: &PipelineOutcome, total: usize) -> Vec<String> {
    match outcome {
        PipelineOutcome::Completed(photos) => {
            let noun = if total == 1 { "photo" } else { "photos" };
            vec![
                String::new(),
                format!("Finished {} of {} {}", photos.len(), total, noun),
            ]
        }
        PipelineOutcome::NoFaceDetected { input } => vec![
            String::new(),
            format!("No face detected in {}; batch stopped", input),
        ],
    }
}

pub fn print_outcome(outcome: &PipelineOutcome, total: usize) {
    for line in format_outcome(outcome, total) {
        println!("{}", line);
    }
}

// ============================================================================
// list
// ============================================================================

/// Format a titled directory listing.
///
/// ```text
/// Photos (original/)
///     001 portrait.png
/// ```
pub fn format_listing(title: &str, dir: &Path, names: &[String]) -> Vec<String> {
    let mut lines = vec![format!("{} ({}/)", title, dir.display())];
    if names.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines.extend(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}{} {}", indent(1), format_index(i + 1), name)),
    );
    lines
}

pub fn print_listing(title: &str, dir: &Path, names: &[String]) {
    for line in format_listing(title, dir, names) {
        println!("{}", line);
    }
}
