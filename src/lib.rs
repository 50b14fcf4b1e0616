//! # imgror
//!
//! A live image resizer and JPEG compressor. Images are collected into an
//! in-memory library, one is selected, and every change to width, height, or
//! quality re-runs the transform so the size tradeoff is visible before
//! anything is exported.
//!
//! # Architecture
//!
//! ```text
//! uploads ─┐
//!          ├─→ ImageLibrary ─→ select ─→ transform (per change) ─→ preview / export
//! URL ─────┘
//! ```
//!
//! - **Library**: name → decoded opaque RGB raster, insertion-ordered,
//!   add-only. Uploads keep their file names; fetched images get
//!   `url_image_<n>.jpg`.
//! - **Acquisition**: upload batches isolate failures per file; a URL fetch
//!   either fully succeeds or leaves the library untouched.
//! - **Transform**: resize to exact dimensions, encode JPEG at quality 10–100.
//!   Deterministic, so the same settings always give the same bytes.
//! - **Session**: owns one library and the current selection. There is no
//!   global state; two sessions never share images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`library`] | The name-keyed image collection |
//! | [`acquire`] | Upload batches and HTTP fetch into the library |
//! | [`imaging`] | Decode, resize, JPEG encode, size math |
//! | [`session`] | Selection, live parameters, preview and export |
//! | [`naming`] | Generated names and `IMGROR_<stem>.jpg` export names |
//! | [`types`] | Serializable report rows |
//! | [`output`] | CLI output formatting |
//! | [`config`] | `imgror.toml` loading, merging, and validation |
//!
//! # Estimated Size
//!
//! Once decoded, an image's original byte size is no longer meaningful for
//! comparison. The "before" number is a JPEG re-encode at native size and a
//! fixed baseline quality (85). The raw payload length is kept alongside it
//! and shown as the source size, but savings are measured against the
//! re-encode.

pub mod acquire;
pub mod config;
pub mod imaging;
pub mod library;
pub mod naming;
pub mod output;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
