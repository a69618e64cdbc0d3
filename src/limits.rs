use crate::error::BitmapError;

/// Resource limits applied before a destination bitmap is allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of one pixel buffer, stride padding included.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject a `width`x`height` buffer of `bytes` bytes if any limit is exceeded.
    pub(crate) fn check_allocation(
        &self,
        width: u32,
        height: u32,
        bytes: usize,
    ) -> Result<(), BitmapError> {
        exceeds("width", u64::from(width), self.max_width)?;
        exceeds("height", u64::from(height), self.max_height)?;
        exceeds(
            "pixel count",
            u64::from(width) * u64::from(height),
            self.max_pixels,
        )?;
        exceeds("allocation bytes", bytes as u64, self.max_memory_bytes)
    }
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), BitmapError> {
    match limit {
        Some(max) if value > max => Err(BitmapError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
