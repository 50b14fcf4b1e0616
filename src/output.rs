//! CLI output formatting.
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Ingest
//!
//! ```text
//! Added
//! 001 photo.png
//! 002 url_image_2.jpg
//!     From: https://example.com/cat.jpg
//! Skipped (already in library)
//! 001 photo.png
//! Failed
//! 001 broken.jpg
//!     Error: Failed to decode broken.jpg: ...
//! ```
//!
//! ## Library
//!
//! ```text
//! Library (2 images)
//! 001 photo.png
//!     Dimensions: 400 x 300 px
//!     Estimated size: 21.40 KB
//!     Source size: 3.92 KB
//! ```
//!
//! ## Preview
//!
//! ```text
//! Original: photo.png
//!     Dimensions: 400 x 300 px
//!     Estimated size: 21.40 KB
//!     Source size: 3.92 KB
//! Settings
//!     Target: 200 x 150 px
//!     Quality: 50
//! Result
//!     Dimensions: 200 x 150 px
//!     New size: 4.02 KB
//!     Saved 17.38 KB
//! ```

use crate::acquire::{AcquireError, IngestReport};
use crate::imaging::{SizeChange, kilobytes};
use crate::types::{EntrySummary, PreviewReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Byte count as KB with two decimals.
pub fn format_kb(bytes: usize) -> String {
    format!("{:.2} KB", kilobytes(bytes))
}

/// One line describing the size comparison.
pub fn format_size_change(change: SizeChange) -> String {
    match change {
        SizeChange::Saved(bytes) => format!("Saved {}", format_kb(bytes)),
        SizeChange::Unchanged => "No size change".to_string(),
        SizeChange::Increased(bytes) => format!(
            "Warning: file size increased by {} (likely due to upscaling)",
            format_kb(bytes)
        ),
    }
}

// ============================================================================
// Ingest
// ============================================================================

/// Format the outcome of an upload batch plus any URL fetches.
pub fn format_ingest(
    report: &IngestReport,
    fetched: &[(String, Result<String, AcquireError>)],
) -> Vec<String> {
    let mut lines = Vec::new();

    let fetched_ok: Vec<(&str, &str)> = fetched
        .iter()
        .filter_map(|(url, r)| r.as_ref().ok().map(|name| (url.as_str(), name.as_str())))
        .collect();
    if !report.added.is_empty() || !fetched_ok.is_empty() {
        lines.push("Added".to_string());
        let mut pos = 0;
        for name in &report.added {
            pos += 1;
            lines.push(format!("{} {}", format_index(pos), name));
        }
        for (url, name) in fetched_ok {
            pos += 1;
            lines.push(format!("{} {}", format_index(pos), name));
            lines.push(format!("    From: {}", url));
        }
    }

    if !report.skipped.is_empty() {
        lines.push("Skipped (already in library)".to_string());
        for (i, name) in report.skipped.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), name));
        }
    }

    let fetch_errors = fetched
        .iter()
        .filter_map(|(url, r)| r.as_ref().err().map(|e| (url.as_str(), e)));
    let failures: Vec<(&str, &AcquireError)> = report
        .failed
        .iter()
        .map(|(name, e)| (name.as_str(), e))
        .chain(fetch_errors)
        .collect();
    if !failures.is_empty() {
        lines.push("Failed".to_string());
        for (i, (name, err)) in failures.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), name));
            lines.push(format!("    Error: {}", err));
        }
    }

    lines
}

pub fn print_ingest(report: &IngestReport, fetched: &[(String, Result<String, AcquireError>)]) {
    for line in format_ingest(report, fetched) {
        println!("{}", line);
    }
}

// ============================================================================
// Library
// ============================================================================

pub fn format_library(rows: &[EntrySummary]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["The library is empty. Add files or a URL.".to_string()];
    }
    let noun = if rows.len() == 1 { "image" } else { "images" };
    let mut lines = vec![format!("Library ({} {})", rows.len(), noun)];
    for (i, row) in rows.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), row.name));
        lines.push(format!("    Dimensions: {}", row.dimensions));
        lines.push(format!(
            "    Estimated size: {}",
            format_kb(row.estimated_bytes)
        ));
        lines.push(format!("    Source size: {}", format_kb(row.source_bytes)));
        if let Some(url) = &row.url {
            lines.push(format!("    From: {}", url));
        }
    }
    lines
}

pub fn print_library(rows: &[EntrySummary]) {
    for line in format_library(rows) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

pub fn format_preview(report: &PreviewReport) -> Vec<String> {
    vec![
        format!("Original: {}", report.name),
        format!("    Dimensions: {}", report.source),
        format!("    Estimated size: {}", format_kb(report.estimated_bytes)),
        format!("    Source size: {}", format_kb(report.source_bytes)),
        "Settings".to_string(),
        format!("    Target: {}", report.params.dimensions()),
        format!("    Quality: {}", report.params.quality.value()),
        "Result".to_string(),
        format!("    Dimensions: {}", report.result),
        format!("    New size: {}", format_kb(report.result_bytes)),
        format!("    {}", format_size_change(report.change)),
    ]
}

pub fn print_preview(report: &PreviewReport) {
    for line in format_preview(report) {
        println!("{}", line);
    }
}

pub fn print_exported(path: &Path) {
    println!("Exported → {}", path.display());
}
