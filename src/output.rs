//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! photo.png
//!     upload: 800x600 ok
//! ```
//!
//! ## Save
//!
//! ```text
//! photo.png
//!     origin → media/origin/photo.png
//!     001 normal: 950x712 → media/normal/photo.png
//!     002 odd: skipped (unknown action "rotate")
//!     003 thumb: 256x256 → media/thumb/photo.png
//!
//! Wrote 3 files, skipped 1 variant
//! ```
//!
//! ## Failure
//!
//! ```text
//! error 21: This type of file is not allowed.
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::error::PipelineResult;
use crate::imaging::Dimensions;
use crate::process::{SaveReport, SkipReason, VariantOutcome};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn skip_text(reason: &SkipReason) -> String {
    match reason {
        SkipReason::UnknownAction(action) => format!("unknown action {action:?}"),
        SkipReason::EmptyGeometry => "nothing to render".to_string(),
    }
}

/// Format one variant line.
///
/// ```text
/// 002 thumb: 256x256 → media/thumb/photo.png
/// 003 odd: skipped (unknown action "rotate")
/// ```
fn variant_line(index: usize, outcome: &VariantOutcome) -> String {
    match outcome {
        VariantOutcome::Written {
            name,
            path,
            width,
            height,
        } => format!(
            "{} {}: {}x{} → {}",
            format_index(index),
            name,
            width,
            height,
            path.display()
        ),
        VariantOutcome::Skipped { name, reason } => format!(
            "{} {}: skipped ({})",
            format_index(index),
            name,
            skip_text(reason)
        ),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of a successful `check`.
pub fn format_check_output(filename: &str, trusted: bool, dimensions: Dimensions) -> Vec<String> {
    let kind = if trusted { "local file" } else { "upload" };
    vec![
        filename.to_string(),
        format!(
            "{}{}: {}x{} ok",
            indent(1),
            kind,
            dimensions.width,
            dimensions.height
        ),
    ]
}

pub fn print_check_output(filename: &str, trusted: bool, dimensions: Dimensions) {
    for line in format_check_output(filename, trusted, dimensions) {
        println!("{}", line);
    }
}

// ============================================================================
// Save
// ============================================================================

/// Format the files written by `save`, followed by a summary line.
pub fn format_save_output(filename: &str, report: &SaveReport) -> Vec<String> {
    let mut lines = vec![filename.to_string()];

    if let Some(origin) = &report.origin {
        lines.push(format!("{}origin → {}", indent(1), origin.display()));
    }
    for (i, outcome) in report.variants.iter().enumerate() {
        lines.push(format!("{}{}", indent(1), variant_line(i + 1, outcome)));
    }

    let written = report.written_paths().len();
    let skipped = report
        .variants
        .iter()
        .filter(|v| matches!(v, VariantOutcome::Skipped { .. }))
        .count();

    lines.push(String::new());
    if skipped == 0 {
        lines.push(format!("Wrote {}", plural(written, "file")));
    } else {
        lines.push(format!(
            "Wrote {}, skipped {}",
            plural(written, "file"),
            plural(skipped, "variant")
        ));
    }
    lines
}

pub fn print_save_output(filename: &str, report: &SaveReport) {
    for line in format_save_output(filename, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Format a failed pipeline result. Successful results format as `ok`.
pub fn format_failure(result: &PipelineResult) -> String {
    if result.ok {
        return "ok".to_string();
    }
    format!("error {}: {}", result.error_code, result.error_message)
}

pub fn print_failure(result: &PipelineResult) {
    eprintln!("{}", format_failure(result));
}
