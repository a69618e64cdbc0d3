//! Per-depth scanline converters: one source row in, one 32-bit row out.
//!
//! Each converter writes exactly `width` 4-byte pixels into the front of
//! `dst` and leaves the rest untouched. Both rows are length-checked up
//! front; a short row is [`BitmapError::BufferTooSmall`], never a panic.
//!
//! ```
//! use zenrgba::row::row_4_to_32_with_transparency;
//! use zenrgba::ChannelOrder;
//! use rgb::RGB8;
//!
//! let palette = [RGB8::new(0, 0, 0), RGB8::new(255, 0, 0)];
//! let mut dst = [0u8; 8];
//! row_4_to_32_with_transparency(&[0x10], 2, &palette, &[128], 1, ChannelOrder::RGBA, &mut dst)?;
//! assert_eq!(dst, [255, 0, 0, 255, 0, 0, 0, 128]);
//! # Ok::<(), zenrgba::BitmapError>(())
//! ```

use rgb::RGB8;

use crate::error::BitmapError;
use crate::pixel::ChannelOrder;

use super::mask::Layout16;
use super::palette::{AlphaSynthesizer, PaletteResolver};

/// Bits per palette index of an indexed source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndexDepth {
    One,
    Four,
    Eight,
}

impl IndexDepth {
    fn bits(self) -> usize {
        match self {
            Self::One => 1,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// 1-bit sources never carry per-index alpha.
    pub(crate) fn takes_transparency(self) -> bool {
        !matches!(self, Self::One)
    }
}

/// Check that `src` holds `width` pixels of `bits` each; return the used prefix.
fn packed_prefix(src: &[u8], width: usize, bits: usize) -> Result<&[u8], BitmapError> {
    let needed = width
        .checked_mul(bits)
        .map(|b| b.div_ceil(8))
        .ok_or(BitmapError::DimensionsTooLarge {
            width: width as u32,
            height: 0,
        })?;
    src.get(..needed).ok_or(BitmapError::BufferTooSmall {
        needed,
        actual: src.len(),
    })
}

/// The `width * 4` bytes of `dst` a converter writes.
fn dst_prefix(dst: &mut [u8], width: usize) -> Result<&mut [u8], BitmapError> {
    let actual = dst.len();
    let needed = width.checked_mul(4).ok_or(BitmapError::DimensionsTooLarge {
        width: width as u32,
        height: 0,
    })?;
    dst.get_mut(..needed)
        .ok_or(BitmapError::BufferTooSmall { needed, actual })
}

/// A row of packed palette indices.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IndexedRow<'a> {
    bytes: &'a [u8],
    width: usize,
    depth: IndexDepth,
}

impl<'a> IndexedRow<'a> {
    pub(crate) fn new(src: &'a [u8], width: usize, depth: IndexDepth) -> Result<Self, BitmapError> {
        Ok(Self {
            bytes: packed_prefix(src, width, depth.bits())?,
            width,
            depth,
        })
    }

    /// MSB-first: pixel `c` is bit `7 - c % 8` of byte `c / 8`.
    #[inline]
    fn bit(&self, c: usize) -> u8 {
        (self.bytes[c >> 3] >> (7 - (c & 7))) & 0x01
    }

    /// High nibble first: even `c` is the high nibble of byte `c / 2`.
    #[inline]
    fn nibble(&self, c: usize) -> u8 {
        let byte = self.bytes[c >> 1];
        if (c & 1) == 0 { byte >> 4 } else { byte & 0x0F }
    }

    #[inline]
    fn index(&self, c: usize) -> u8 {
        match self.depth {
            IndexDepth::One => self.bit(c),
            IndexDepth::Four => self.nibble(c),
            IndexDepth::Eight => self.bytes[c],
        }
    }

    /// Palette index of every pixel, left to right.
    pub(crate) fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.width).map(move |c| self.index(c))
    }
}

/// 1/4/8-bit: palette lookup with alpha 255, then the optional
/// transparency post-pass over the same row.
pub(crate) fn indexed(
    src: &[u8],
    width: usize,
    depth: IndexDepth,
    palette: &PaletteResolver<'_>,
    alpha: Option<&AlphaSynthesizer<'_>>,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let row = IndexedRow::new(src, width, depth)?;
    let dst = dst_prefix(dst, width)?;
    for (index, px) in row.indices().zip(dst.chunks_exact_mut(4)) {
        let c = palette.resolve(index);
        order.write(px, c.r, c.g, c.b, 0xFF);
    }
    if let Some(alpha) = alpha {
        alpha.apply(row.indices(), dst, order);
    }
    Ok(())
}

/// 16-bit little-endian words: mask, shift, scale each channel; alpha 255.
pub(crate) fn packed16(
    src: &[u8],
    width: usize,
    layout: Layout16,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let src = packed_prefix(src, width, 16)?;
    let dst = dst_prefix(dst, width)?;
    let [red, green, blue] = layout.channels();
    for (word, px) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        let v = u16::from_le_bytes([word[0], word[1]]);
        order.write(
            px,
            red.extract(v),
            green.extract(v),
            blue.extract(v),
            0xFF,
        );
    }
    Ok(())
}

/// 24-bit: repack three colour bytes from `source` order into `order`,
/// alpha 255. No rescaling.
pub(crate) fn rgb24(
    src: &[u8],
    width: usize,
    source: ChannelOrder,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let src = packed_prefix(src, width, 24)?;
    let dst = dst_prefix(dst, width)?;
    copy_rgb24(src, dst, source, order);
    Ok(())
}

#[cfg(feature = "simd")]
fn copy_rgb24(src: &[u8], dst: &mut [u8], source: ChannelOrder, order: ChannelOrder) {
    let copied = if source.red() == order.red() {
        garb::bytes::rgb_to_rgba(src, dst)
    } else {
        garb::bytes::rgb_to_bgra(src, dst)
    };
    // Only fails on empty or misaligned slices, which the prefix checks rule out.
    if copied.is_err() {
        copy_rgb24_scalar(src, dst, source, order);
    }
}

#[cfg(not(feature = "simd"))]
fn copy_rgb24(src: &[u8], dst: &mut [u8], source: ChannelOrder, order: ChannelOrder) {
    copy_rgb24_scalar(src, dst, source, order);
}

fn copy_rgb24_scalar(src: &[u8], dst: &mut [u8], source: ChannelOrder, order: ChannelOrder) {
    for (rgb, px) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        order.write(
            px,
            rgb[source.red()],
            rgb[source.green()],
            rgb[source.blue()],
            0xFF,
        );
    }
}

// ── Public row API ───────────────────────────────────────────────────

/// Convert a row of 1-bit palette indices (MSB first). Always opaque.
pub fn row_1_to_32(
    src: &[u8],
    width: usize,
    palette: &[RGB8],
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let palette = PaletteResolver::new(palette);
    indexed(src, width, IndexDepth::One, &palette, None, order, dst)
}

/// Convert a row of 4-bit palette indices (high nibble first). Opaque.
pub fn row_4_to_32(
    src: &[u8],
    width: usize,
    palette: &[RGB8],
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let palette = PaletteResolver::new(palette);
    indexed(src, width, IndexDepth::Four, &palette, None, order, dst)
}

/// Like [`row_4_to_32`], with alpha `table[index]` for `index < count`.
pub fn row_4_to_32_with_transparency(
    src: &[u8],
    width: usize,
    palette: &[RGB8],
    table: &[u8],
    count: usize,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let palette = PaletteResolver::new(palette);
    let alpha = AlphaSynthesizer::new(table, count);
    indexed(src, width, IndexDepth::Four, &palette, Some(&alpha), order, dst)
}

/// Convert a row of 8-bit palette indices. Opaque.
pub fn row_8_to_32(
    src: &[u8],
    width: usize,
    palette: &[RGB8],
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let palette = PaletteResolver::new(palette);
    indexed(src, width, IndexDepth::Eight, &palette, None, order, dst)
}

/// Like [`row_8_to_32`], with alpha `table[index]` for `index < count`.
pub fn row_8_to_32_with_transparency(
    src: &[u8],
    width: usize,
    palette: &[RGB8],
    table: &[u8],
    count: usize,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    let palette = PaletteResolver::new(palette);
    let alpha = AlphaSynthesizer::new(table, count);
    indexed(src, width, IndexDepth::Eight, &palette, Some(&alpha), order, dst)
}

/// Convert a row of little-endian 5-5-5 words (top bit ignored).
pub fn row_16_555_to_32(
    src: &[u8],
    width: usize,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    packed16(src, width, Layout16::Rgb555, order, dst)
}

/// Convert a row of little-endian 5-6-5 words.
pub fn row_16_565_to_32(
    src: &[u8],
    width: usize,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    packed16(src, width, Layout16::Rgb565, order, dst)
}

/// Convert a row of 3-byte pixels stored in `source` byte order
/// ([`ChannelOrder::RGBA`] for RGB, [`ChannelOrder::BGRA`] for BGR).
pub fn row_24_to_32(
    src: &[u8],
    width: usize,
    source: ChannelOrder,
    order: ChannelOrder,
    dst: &mut [u8],
) -> Result<(), BitmapError> {
    rgb24(src, width, source, order, dst)
}
