//! Report types shared by the session, the CLI printer, and `--json` output.

use crate::imaging::{Dimensions, SizeChange, TransformParams};
use serde::Serialize;

/// One row of the library listing.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub name: String,
    pub dimensions: Dimensions,
    /// Baseline re-encode size. An estimate, not the file's size on disk.
    pub estimated_bytes: usize,
    /// Length of the uploaded or fetched payload.
    pub source_bytes: usize,
    /// URL the image was fetched from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Everything the live preview shows for the active image.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    pub name: String,
    pub source: Dimensions,
    /// Baseline re-encode of the source at native size.
    pub estimated_bytes: usize,
    pub source_bytes: usize,
    pub params: TransformParams,
    pub result: Dimensions,
    pub result_bytes: usize,
    /// `result_bytes` compared against `estimated_bytes`.
    pub change: SizeChange,
    pub export_filename: String,
}
