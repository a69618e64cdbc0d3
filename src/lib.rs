//! # zenrgba
//!
//! Normalize indexed and packed-channel bitmaps to one 32-bit-per-pixel
//! layout with explicit red, green, blue and alpha.
//!
//! ## Supported source depths
//!
//! - **1-bit**: MSB-first bit per pixel, 2-entry palette. Always opaque.
//! - **4-bit**: two pixels per byte, high nibble first, up to 16 colours.
//!   Optional per-index transparency table.
//! - **8-bit**: one palette index per byte, up to 256 colours.
//!   Optional per-index transparency table.
//! - **16-bit**: little-endian packed words, 5-6-5 when the declared masks
//!   are exactly `F800/07E0/001F`, otherwise 5-5-5 (including when no masks
//!   are declared). Channels scale by `v * 255 / max`. Always opaque.
//! - **24-bit**: three colour bytes, alpha 255. Copied verbatim when the
//!   source byte order (RGB, or BGR when the masks say so) matches the
//!   requested output order, swapped otherwise.
//! - **32-bit and anything else**: returned as an unmodified duplicate.
//!
//! Rows are converted top to bottom in stored order; nothing is flipped.
//! Palette and transparency lookups are bounds-checked: an index past the
//! palette reads black, an index past the transparency table is opaque.
//!
//! Single rows convert through the [`row`] functions.
//!
//! ## Non-Goals
//!
//! - File format decoding (feed a decoded [`Bitmap`] or your own
//!   [`SourceBitmap`])
//! - Gamma-aware channel scaling
//! - Resampling or filtering
//!
//! ## Feature flags
//!
//! - **`simd`**: 24-bit rows use [`garb`](https://docs.rs/garb)'s SIMD
//!   RGB→RGBA copy.
//! - **`imgref`**: [`Bitmap::to_imgvec`] for converted bitmaps.
//!
//! ## Usage
//!
//! ```
//! use zenrgba::{Bitmap, ChannelMasks, ConvertRequest, Unstoppable};
//! use rgb::RGB8;
//!
//! // 2x1, 4 bits per pixel: high nibble = index 1, low nibble = index 0
//! let mut src = Bitmap::allocate(2, 1, 4, ChannelMasks::NONE)?
//!     .with_palette(vec![RGB8::new(0, 0, 0), RGB8::new(255, 0, 0)])?
//!     .with_transparency(vec![128])?;
//! src.scanline_mut(0)[0] = 0x10;
//!
//! let rgba = ConvertRequest::new(&src).convert(Unstoppable)?;
//! assert_eq!(&rgba.scanline(0)[..8], &[255, 0, 0, 255, 0, 0, 0, 128]);
//! # Ok::<(), zenrgba::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bitmap;
mod convert;
mod error;
mod limits;
mod pixel;

// Re-exports
pub use bitmap::{Bitmap, MAX_PALETTE_ENTRIES, SourceBitmap, row_bytes};
pub use convert::{ConvertRequest, convert_to_32bits, convert_to_32bits_bgra};
pub use convert::row;
pub use enough::{Stop, Unstoppable};
pub use error::BitmapError;
pub use limits::Limits;
pub use pixel::{ChannelMasks, ChannelOrder};
