//! The image library: a session's name-keyed collection of decoded images.
//!
//! Entries are only ever added. A name, once taken, keeps its image for the
//! life of the library: uploading the same filename again is a silent no-op,
//! and generated URL names skip over anything already taken.
//!
//! Iteration follows insertion order, which is what a selection list shows.

use crate::imaging::{BackendError, Dimensions, ImageBackend};
use crate::naming::generated_name;
use image::RgbImage;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: BackendError,
    },
    #[error("Image not found in library: {0}")]
    NotFound(String),
}

/// Where an entry's bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Upload,
    Url(String),
}

#[derive(Debug, Clone)]
pub struct LibraryEntry {
    pub name: String,
    /// Opaque RGB raster, ready for JPEG encoding.
    pub image: RgbImage,
    pub origin: Origin,
    /// Length of the payload the image was decoded from.
    pub source_len: usize,
}

impl LibraryEntry {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }
}

#[derive(Debug, Default)]
pub struct ImageLibrary {
    entries: Vec<LibraryEntry>,
    index: HashMap<String, usize>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Result<&LibraryEntry, LibraryError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    /// Decode and insert, unless `name` is already present.
    ///
    /// Returns `Ok(false)` without decoding when the name exists.
    pub fn add_if_absent(
        &mut self,
        backend: &impl ImageBackend,
        name: &str,
        bytes: &[u8],
    ) -> Result<bool, LibraryError> {
        if self.contains(name) {
            debug!(name, "already in library, skipping");
            return Ok(false);
        }
        let image = backend.decode(bytes).map_err(|source| LibraryError::Decode {
            name: name.to_string(),
            source,
        })?;
        self.push(name.to_string(), image, Origin::Upload, bytes.len());
        Ok(true)
    }

    /// The name the next generated insert would use.
    pub fn next_generated_name(&self) -> String {
        let mut count = self.len();
        loop {
            let name = generated_name(count);
            if !self.contains(&name) {
                return name;
            }
            count += 1;
        }
    }

    /// Insert an already-decoded image under a fresh generated name.
    pub fn insert_generated(
        &mut self,
        image: RgbImage,
        origin: Origin,
        source_len: usize,
    ) -> String {
        let name = self.next_generated_name();
        self.push(name.clone(), image, origin, source_len);
        name
    }

    fn push(&mut self, name: String, image: RgbImage, origin: Origin, source_len: usize) {
        debug!(
            name = %name,
            width = image.width(),
            height = image.height(),
            "added to library"
        );
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(LibraryEntry {
            name,
            image,
            origin,
            source_len,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::collections::HashSet;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn new_library_is_empty() {
        let lib = ImageLibrary::new();
        assert!(lib.is_empty());
        assert!(lib.names().is_empty());
        assert_eq!(lib.next_generated_name(), "url_image_1.jpg");
    }

    #[test]
    fn add_if_absent_inserts_once() {
        let backend = MockBackend::with_dimensions(vec![dims(20, 20), dims(10, 10)]);
        let mut lib = ImageLibrary::new();

        assert!(lib.add_if_absent(&backend, "a.png", b"first").unwrap());
        assert!(!lib.add_if_absent(&backend, "a.png", b"second!").unwrap());

        assert_eq!(lib.names(), vec!["a.png"]);
        let entry = lib.get("a.png").unwrap();
        assert_eq!(entry.dimensions(), dims(10, 10));
        assert_eq!(entry.source_len, 5);
        assert_eq!(entry.origin, Origin::Upload);
        // Second call never reached the decoder.
        assert_eq!(backend.get_operations(), vec![RecordedOp::Decode(5)]);
    }

    #[test]
    fn add_if_absent_decode_failure_leaves_library_unchanged() {
        let backend = MockBackend::new();
        let mut lib = ImageLibrary::new();

        let err = lib.add_if_absent(&backend, "broken.png", &[]).unwrap_err();
        assert!(matches!(err, LibraryError::Decode { ref name, .. } if name == "broken.png"));
        assert!(lib.is_empty());
    }

    #[test]
    fn names_follow_insertion_order() {
        let backend = MockBackend::new();
        let mut lib = ImageLibrary::new();
        for name in ["zebra.png", "apple.jpg", "mango.jpeg"] {
            lib.add_if_absent(&backend, name, b"x").unwrap();
        }
        assert_eq!(lib.names(), vec!["zebra.png", "apple.jpg", "mango.jpeg"]);
    }

    #[test]
    fn get_missing_is_not_found() {
        let lib = ImageLibrary::new();
        assert!(matches!(lib.get("nope"), Err(LibraryError::NotFound(n)) if n == "nope"));
    }

    #[test]
    fn generated_name_counts_existing_entries() {
        let backend = MockBackend::new();
        let mut lib = ImageLibrary::new();
        lib.add_if_absent(&backend, "one.png", b"x").unwrap();
        lib.add_if_absent(&backend, "two.png", b"x").unwrap();

        assert_eq!(lib.next_generated_name(), "url_image_3.jpg");
        let name = lib.insert_generated(RgbImage::new(2, 2), Origin::Url("u".into()), 9);
        assert_eq!(name, "url_image_3.jpg");
        assert_eq!(lib.get(&name).unwrap().origin, Origin::Url("u".into()));
    }

    #[test]
    fn generated_names_are_pairwise_distinct() {
        let mut lib = ImageLibrary::new();
        let names: Vec<String> = (0..25)
            .map(|_| lib.insert_generated(RgbImage::new(1, 1), Origin::Url("u".into()), 1))
            .collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 25);
        assert_eq!(lib.len(), 25);
    }

    #[test]
    fn generated_name_skips_upload_that_claimed_it() {
        let backend = MockBackend::with_dimensions(vec![dims(3, 3)]);
        let mut lib = ImageLibrary::new();
        // An upload literally named like the next generated name.
        lib.add_if_absent(&backend, "url_image_2.jpg", b"x").unwrap();

        let name = lib.insert_generated(RgbImage::new(1, 1), Origin::Url("u".into()), 1);
        assert_eq!(name, "url_image_3.jpg");
        assert_eq!(lib.get("url_image_2.jpg").unwrap().dimensions(), dims(3, 3));
    }
}
