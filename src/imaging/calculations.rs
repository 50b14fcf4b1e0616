//! Pure calculation functions for sizes and dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use serde::Serialize;

/// Bytes to kilobytes (1 KB = 1024 bytes), as shown to the user.
pub fn kilobytes(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

/// Outcome of comparing the re-encoded size against the baseline estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "bytes", rename_all = "snake_case")]
pub enum SizeChange {
    /// New output is smaller by this many bytes.
    Saved(usize),
    Unchanged,
    /// New output is larger by this many bytes (typically from upscaling).
    Increased(usize),
}

impl SizeChange {
    /// Compare `after` against `before`.
    ///
    /// # Examples
    /// ```
    /// # use imgror::imaging::SizeChange;
    /// assert_eq!(SizeChange::between(2048, 1024), SizeChange::Saved(1024));
    /// assert_eq!(SizeChange::between(1024, 1024), SizeChange::Unchanged);
    /// assert_eq!(SizeChange::between(1024, 1536), SizeChange::Increased(512));
    /// ```
    pub fn between(before: usize, after: usize) -> Self {
        match after.cmp(&before) {
            std::cmp::Ordering::Less => Self::Saved(before - after),
            std::cmp::Ordering::Equal => Self::Unchanged,
            std::cmp::Ordering::Greater => Self::Increased(after - before),
        }
    }

    /// Savings in KB, negative when the output grew.
    pub fn savings_kb(self) -> f64 {
        match self {
            Self::Saved(b) => kilobytes(b),
            Self::Unchanged => 0.0,
            Self::Increased(b) => -kilobytes(b),
        }
    }
}

/// Height that keeps the source aspect ratio at the given width.
///
/// Never returns 0: a very wide source scaled down still gets one row.
///
/// # Examples
/// ```
/// # use imgror::imaging::height_for_width;
/// assert_eq!(height_for_width((400, 300), 200), 150);
/// assert_eq!(height_for_width((1000, 1), 10), 1);
/// ```
pub fn height_for_width(source: (u32, u32), width: u32) -> u32 {
    let (src_w, src_h) = source;
    let h = (width as f64 * src_h as f64 / src_w as f64).round() as u32;
    h.max(1)
}

/// Width that keeps the source aspect ratio at the given height.
pub fn width_for_height(source: (u32, u32), height: u32) -> u32 {
    let (src_w, src_h) = source;
    let w = (height as f64 * src_w as f64 / src_h as f64).round() as u32;
    w.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilobytes_divides_by_1024() {
        assert_eq!(kilobytes(0), 0.0);
        assert_eq!(kilobytes(1024), 1.0);
        assert_eq!(kilobytes(1536), 1.5);
    }

    #[test]
    fn size_change_saved() {
        let change = SizeChange::between(10_240, 5_120);
        assert_eq!(change, SizeChange::Saved(5_120));
        assert_eq!(change.savings_kb(), 5.0);
    }

    #[test]
    fn size_change_increased_is_negative_savings() {
        let change = SizeChange::between(1_024, 3_072);
        assert_eq!(change, SizeChange::Increased(2_048));
        assert_eq!(change.savings_kb(), -2.0);
    }

    #[test]
    fn size_change_equal() {
        assert_eq!(SizeChange::between(7, 7), SizeChange::Unchanged);
        assert_eq!(SizeChange::Unchanged.savings_kb(), 0.0);
    }

    #[test]
    fn size_change_serializes_tagged() {
        let json = serde_json::to_string(&SizeChange::Saved(12)).unwrap();
        assert_eq!(json, r#"{"kind":"saved","bytes":12}"#);
        let json = serde_json::to_string(&SizeChange::Unchanged).unwrap();
        assert_eq!(json, r#"{"kind":"unchanged"}"#);
    }

    #[test]
    fn aspect_landscape() {
        assert_eq!(height_for_width((1600, 900), 800), 450);
        assert_eq!(width_for_height((1600, 900), 450), 800);
    }

    #[test]
    fn aspect_portrait_rounds() {
        // 333 * 4/3 = 444
        assert_eq!(height_for_width((600, 800), 333), 444);
        assert_eq!(width_for_height((600, 800), 100), 75);
    }

    #[test]
    fn aspect_upscale() {
        assert_eq!(height_for_width((100, 100), 500), 500);
    }

    #[test]
    fn aspect_never_zero() {
        assert_eq!(height_for_width((5000, 10), 10), 1);
        assert_eq!(width_for_height((10, 5000), 10), 1);
    }
}
