//! Owned bitmap container and the source contract the converter reads through.

use alloc::vec;
use alloc::vec::Vec;

use rgb::{AsPixels as _, RGB8};

use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::ChannelMasks;

/// Largest palette or transparency table an indexed bitmap may carry.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// Read-only view of a bitmap, as consumed by the converter.
///
/// [`Bitmap`] implements this; implement it for your own container to
/// convert without copying into a `Bitmap` first.
pub trait SourceBitmap {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Bits per pixel. Any value is accepted; depths the converter does not
    /// understand are duplicated unchanged.
    fn bit_depth(&self) -> u16;

    /// Bytes of row `row`, top row first. Must hold at least
    /// [`row_bytes`]`(width, bit_depth)` bytes.
    ///
    /// Only called with `row < height()`.
    fn scanline(&self, row: u32) -> &[u8];

    /// Palette for indexed depths (empty otherwise).
    fn palette(&self) -> &[RGB8] {
        &[]
    }

    fn has_transparency(&self) -> bool {
        false
    }

    fn transparency_table(&self) -> &[u8] {
        &[]
    }

    /// Number of meaningful entries in [`Self::transparency_table`].
    fn transparency_count(&self) -> usize {
        self.transparency_table().len()
    }

    /// Declared red/green/blue masks for 16/24/32-bit depths.
    fn channel_masks(&self) -> ChannelMasks {
        ChannelMasks::NONE
    }

    /// Bytes [`Self::duplicate`] allocates for the pixel buffer, stride
    /// padding included.
    fn buffer_size(&self) -> Result<usize, BitmapError> {
        buffer_layout(self.width(), self.height(), self.bit_depth()).map(|(_, total)| total)
    }

    /// Full copy of this bitmap: pixels, palette, transparency and masks.
    fn duplicate(&self) -> Result<Bitmap, BitmapError> {
        let mut copy = Bitmap::allocate(
            self.width(),
            self.height(),
            self.bit_depth(),
            self.channel_masks(),
        )?;
        let packed = row_bytes(self.width(), self.bit_depth())?;
        for row in 0..self.height() {
            let src = self.scanline(row);
            let src = src.get(..packed).ok_or(BitmapError::BufferTooSmall {
                needed: packed,
                actual: src.len(),
            })?;
            copy.scanline_mut(row)[..packed].copy_from_slice(src);
        }
        if !self.palette().is_empty() {
            copy = copy.with_palette(self.palette().to_vec())?;
        }
        if self.has_transparency() {
            let count = self.transparency_count().min(self.transparency_table().len());
            copy = copy.with_transparency(self.transparency_table()[..count].to_vec())?;
        }
        Ok(copy)
    }
}

/// Minimum bytes needed to hold one row of `width` pixels at `depth` bits.
pub fn row_bytes(width: u32, depth: u16) -> Result<usize, BitmapError> {
    (width as usize)
        .checked_mul(usize::from(depth))
        .map(|bits| bits.div_ceil(8))
        .ok_or(BitmapError::DimensionsTooLarge { width, height: 0 })
}

/// Black palette with `2^depth` entries for indexed depths, empty otherwise.
fn black_palette(depth: u16) -> Vec<RGB8> {
    if depth <= 8 {
        vec![RGB8::default(); 1 << depth]
    } else {
        Vec::new()
    }
}

/// Row stride and total buffer size for a freshly allocated bitmap.
///
/// Rows are padded to a 4-byte boundary, like DIB scanlines.
pub(crate) fn buffer_layout(width: u32, height: u32, depth: u16) -> Result<(usize, usize), BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidBitmap(alloc::format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if depth == 0 {
        return Err(BitmapError::InvalidBitmap("bit depth is zero".into()));
    }
    row_bytes(width, depth)
        .ok()
        .and_then(|packed| packed.checked_next_multiple_of(4))
        .and_then(|stride| Some((stride, stride.checked_mul(height as usize)?)))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })
}

/// An owned, row-major bitmap.
///
/// Rows are stored top to bottom. `stride` may exceed the packed row size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    depth: u16,
    stride: usize,
    data: Vec<u8>,
    palette: Vec<RGB8>,
    transparency: Option<Vec<u8>>,
    masks: ChannelMasks,
}

impl Bitmap {
    /// Allocate a zeroed bitmap.
    ///
    /// Depths of 8 bits or fewer get a black palette with `2^depth` entries.
    /// Fails with [`BitmapError::AllocationFailed`] if the pixel buffer
    /// cannot be reserved.
    pub fn allocate(
        width: u32,
        height: u32,
        depth: u16,
        masks: ChannelMasks,
    ) -> Result<Self, BitmapError> {
        let (stride, total) = buffer_layout(width, height, depth)?;
        Self::allocate_layout(width, height, depth, masks, stride, total)
    }

    /// Like [`Bitmap::allocate`], but refuses allocations over `limits`.
    pub fn allocate_with_limits(
        width: u32,
        height: u32,
        depth: u16,
        masks: ChannelMasks,
        limits: &Limits,
    ) -> Result<Self, BitmapError> {
        let (stride, total) = buffer_layout(width, height, depth)?;
        limits.check_allocation(width, height, total)?;
        Self::allocate_layout(width, height, depth, masks, stride, total)
    }

    fn allocate_layout(
        width: u32,
        height: u32,
        depth: u16,
        masks: ChannelMasks,
        stride: usize,
        total: usize,
    ) -> Result<Self, BitmapError> {
        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| BitmapError::AllocationFailed { bytes: total })?;
        data.resize(total, 0);

        Ok(Self {
            width,
            height,
            depth,
            stride,
            data,
            palette: black_palette(depth),
            transparency: None,
            masks,
        })
    }

    /// Wrap an existing pixel buffer.
    ///
    /// `stride` must cover a packed row and `data` must hold `stride * height` bytes.
    /// Like [`Bitmap::allocate`], depths of 8 bits or fewer start with a black
    /// `2^depth`-entry palette.
    pub fn from_parts(
        width: u32,
        height: u32,
        depth: u16,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        buffer_layout(width, height, depth)?;
        let packed = row_bytes(width, depth)?;
        if stride < packed {
            return Err(BitmapError::InvalidBitmap(alloc::format!(
                "stride {stride} is shorter than a {width}-pixel row at {depth} bits ({packed} bytes)"
            )));
        }
        let needed = stride
            .checked_mul(height as usize)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        if data.len() < needed {
            return Err(BitmapError::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            stride,
            data,
            palette: black_palette(depth),
            transparency: None,
            masks: ChannelMasks::NONE,
        })
    }

    /// Replace the palette. At most 256 entries.
    pub fn with_palette(mut self, palette: Vec<RGB8>) -> Result<Self, BitmapError> {
        if palette.len() > MAX_PALETTE_ENTRIES {
            return Err(BitmapError::InvalidBitmap(alloc::format!(
                "palette has {} entries (max {MAX_PALETTE_ENTRIES})",
                palette.len()
            )));
        }
        self.palette = palette;
        Ok(self)
    }

    /// Attach a per-index alpha table. At most 256 entries.
    ///
    /// An empty table removes transparency.
    pub fn with_transparency(mut self, table: Vec<u8>) -> Result<Self, BitmapError> {
        if table.len() > MAX_PALETTE_ENTRIES {
            return Err(BitmapError::InvalidBitmap(alloc::format!(
                "transparency table has {} entries (max {MAX_PALETTE_ENTRIES})",
                table.len()
            )));
        }
        self.transparency = (!table.is_empty()).then_some(table);
        Ok(self)
    }

    pub fn with_channel_masks(mut self, masks: ChannelMasks) -> Self {
        self.masks = masks;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bit_depth(&self) -> u16 {
        self.depth
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn channel_masks(&self) -> ChannelMasks {
        self.masks
    }

    pub fn palette(&self) -> &[RGB8] {
        &self.palette
    }

    pub fn transparency_table(&self) -> Option<&[u8]> {
        self.transparency.as_deref()
    }

    /// The whole pixel buffer, padding included.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Row `row` including stride padding.
    ///
    /// # Panics
    ///
    /// If `row >= height`.
    pub fn scanline(&self, row: u32) -> &[u8] {
        let start = row as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Mutable row `row` including stride padding.
    ///
    /// # Panics
    ///
    /// If `row >= height`.
    pub fn scanline_mut(&mut self, row: u32) -> &mut [u8] {
        let start = row as usize * self.stride;
        &mut self.data[start..start + self.stride]
    }

    /// View a packed 32-bit bitmap as typed 4-byte pixels.
    ///
    /// Use `rgb::RGBA8` for [`ChannelOrder::RGBA`](crate::ChannelOrder::RGBA)
    /// output and `rgb::alt::BGRA8` for BGRA output.
    pub fn as_pixels<P>(&self) -> Result<&[P], BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_packed_32::<P>()?;
        Ok(self.data.as_slice().as_pixels())
    }

    /// Copy a packed 32-bit bitmap into an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: Copy>(&self) -> Result<imgref::ImgVec<P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }

    fn check_packed_32<P>(&self) -> Result<(), BitmapError> {
        if self.depth != 32 || core::mem::size_of::<P>() != 4 {
            return Err(BitmapError::InvalidBitmap(alloc::format!(
                "typed pixel access needs a 32-bit bitmap and 4-byte pixels, got {} bits and {}-byte pixels",
                self.depth,
                core::mem::size_of::<P>()
            )));
        }
        if self.stride != self.width as usize * 4 {
            return Err(BitmapError::InvalidBitmap(alloc::format!(
                "stride {} has row padding; typed access needs {}",
                self.stride,
                self.width as usize * 4
            )));
        }
        Ok(())
    }
}

impl SourceBitmap for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bit_depth(&self) -> u16 {
        self.depth
    }

    fn scanline(&self, row: u32) -> &[u8] {
        Bitmap::scanline(self, row)
    }

    fn palette(&self) -> &[RGB8] {
        &self.palette
    }

    fn has_transparency(&self) -> bool {
        self.transparency.is_some()
    }

    fn transparency_table(&self) -> &[u8] {
        self.transparency.as_deref().unwrap_or(&[])
    }

    fn channel_masks(&self) -> ChannelMasks {
        self.masks
    }

    fn buffer_size(&self) -> Result<usize, BitmapError> {
        Ok(self.data.len())
    }

    fn duplicate(&self) -> Result<Bitmap, BitmapError> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| BitmapError::AllocationFailed {
                bytes: self.data.len(),
            })?;
        data.extend_from_slice(&self.data);
        Ok(Bitmap {
            data,
            palette: self.palette.clone(),
            transparency: self.transparency.clone(),
            ..*self
        })
    }
}
