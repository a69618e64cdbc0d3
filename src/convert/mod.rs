//! Whole-bitmap conversion to 32 bits per pixel.

mod mask;
mod palette;
pub mod row;

use enough::Stop;

use crate::bitmap::{Bitmap, SourceBitmap};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::{ChannelMasks, ChannelOrder};

use mask::Layout16;
use palette::{AlphaSynthesizer, PaletteResolver};
use row::IndexDepth;

/// Row converter chosen from a source's bit depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowKind {
    Indexed(IndexDepth),
    Packed16(Layout16),
    /// Three bytes per pixel in the given byte order.
    Rgb24(ChannelOrder),
}

impl RowKind {
    /// `None` for depth 32 and depths with no converter: those are
    /// duplicated unchanged.
    fn for_source<B: SourceBitmap + ?Sized>(src: &B) -> Option<Self> {
        match src.bit_depth() {
            1 => Some(Self::Indexed(IndexDepth::One)),
            4 => Some(Self::Indexed(IndexDepth::Four)),
            8 => Some(Self::Indexed(IndexDepth::Eight)),
            16 => Some(Self::Packed16(Layout16::detect(src.channel_masks()))),
            24 => Some(Self::Rgb24(ChannelOrder::from_masks(src.channel_masks()))),
            _ => None,
        }
    }
}

/// Builder for converting one bitmap to 32 bits per pixel.
///
/// ```
/// use zenrgba::{Bitmap, ChannelMasks, ConvertRequest, Unstoppable};
///
/// let src = Bitmap::allocate(4, 4, 8, ChannelMasks::NONE)?;
/// let rgba = ConvertRequest::new(&src).convert(Unstoppable)?;
/// assert_eq!(rgba.bit_depth(), 32);
/// # Ok::<(), zenrgba::BitmapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ConvertRequest<'a, B: SourceBitmap + ?Sized = Bitmap> {
    source: Option<&'a B>,
    limits: Option<&'a Limits>,
    order: ChannelOrder,
}

impl<'a, B: SourceBitmap + ?Sized> ConvertRequest<'a, B> {
    pub fn new(source: &'a B) -> Self {
        Self::from_option(Some(source))
    }

    /// A `None` source fails with [`BitmapError::AbsentInput`] at [`Self::convert`].
    pub fn from_option(source: Option<&'a B>) -> Self {
        Self {
            source,
            limits: None,
            order: ChannelOrder::RGBA,
        }
    }

    /// Refuse destinations (and passthrough duplicates) over `limits`.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Destination byte order. Defaults to [`ChannelOrder::RGBA`].
    pub fn with_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    /// Run the conversion.
    ///
    /// Returns a fully populated bitmap or an error; nothing partial.
    pub fn convert(self, stop: impl Stop) -> Result<Bitmap, BitmapError> {
        let src = self.source.ok_or(BitmapError::AbsentInput)?;
        convert_source(src, self.limits, self.order, &stop)
    }
}

/// Convert `source` to 32-bit RGBA.
///
/// Depth 32 and unsupported depths come back as an unmodified duplicate.
pub fn convert_to_32bits<B: SourceBitmap + ?Sized>(
    source: Option<&B>,
    stop: impl Stop,
) -> Result<Bitmap, BitmapError> {
    ConvertRequest::from_option(source).convert(stop)
}

/// Convert `source` to 32-bit BGRA (Windows DIB byte order).
pub fn convert_to_32bits_bgra<B: SourceBitmap + ?Sized>(
    source: Option<&B>,
    stop: impl Stop,
) -> Result<Bitmap, BitmapError> {
    ConvertRequest::from_option(source)
        .with_order(ChannelOrder::BGRA)
        .convert(stop)
}

fn convert_source<B: SourceBitmap + ?Sized>(
    src: &B,
    limits: Option<&Limits>,
    order: ChannelOrder,
    stop: &dyn Stop,
) -> Result<Bitmap, BitmapError> {
    let width = src.width();
    let height = src.height();
    stop.check()?;

    let Some(kind) = RowKind::for_source(src) else {
        return passthrough(src, limits);
    };

    let masks = ChannelMasks::for_order(order);
    let mut dst = match limits {
        Some(limits) => Bitmap::allocate_with_limits(width, height, 32, masks, limits)?,
        None => Bitmap::allocate(width, height, 32, masks)?,
    };

    let w = width as usize;
    let palette = PaletteResolver::new(src.palette());
    let alpha = match kind {
        RowKind::Indexed(depth) if depth.takes_transparency() && src.has_transparency() => Some(
            AlphaSynthesizer::new(src.transparency_table(), src.transparency_count()),
        ),
        _ => None,
    };

    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        let line = src.scanline(row);
        let out = dst.scanline_mut(row);
        match kind {
            RowKind::Indexed(depth) => {
                row::indexed(line, w, depth, &palette, alpha.as_ref(), order, out)?
            }
            RowKind::Packed16(layout) => row::packed16(line, w, layout, order, out)?,
            RowKind::Rgb24(source) => row::rgb24(line, w, source, order, out)?,
        }
    }

    Ok(dst)
}

fn passthrough<B: SourceBitmap + ?Sized>(
    src: &B,
    limits: Option<&Limits>,
) -> Result<Bitmap, BitmapError> {
    if let Some(limits) = limits {
        limits.check_allocation(src.width(), src.height(), src.buffer_size()?)?;
    }
    src.duplicate()
}
