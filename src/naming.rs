//! Library names and export filenames.
//!
//! ## Generated names
//!
//! Images fetched from a URL have no usable filename, so they are named after
//! the library size at insertion time: the first fetch into an empty library
//! becomes `url_image_1.jpg`, a fetch after three uploads becomes
//! `url_image_4.jpg`.
//!
//! ## Export names
//!
//! The downloadable result is always JPEG. Its name drops the final extension
//! segment of the library name and adds a fixed prefix:
//! - `photo.png` → `IMGROR_photo.jpg`
//! - `noext` → `IMGROR_noext.jpg`
//! - `a.b.c` → `IMGROR_a.b.jpg`

/// Prefix of every exported file.
pub const EXPORT_PREFIX: &str = "IMGROR_";

/// Name for the next URL-fetched image given the current library size.
pub fn generated_name(count: usize) -> String {
    format!("url_image_{}.jpg", count + 1)
}

/// Name without its final `.segment`. Names without a dot come back whole.
pub fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Filename offered for download for the library entry `name`.
pub fn export_filename(name: &str) -> String {
    format!("{EXPORT_PREFIX}{}.jpg", strip_extension(name))
}

/// Lowercased final extension, if any.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
