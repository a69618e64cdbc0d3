//! Palette index resolution and per-index alpha.

use rgb::RGB8;

use crate::pixel::ChannelOrder;

/// Resolves palette indices to colours.
///
/// Indices past the end of the palette resolve to black.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PaletteResolver<'a> {
    entries: &'a [RGB8],
}

impl<'a> PaletteResolver<'a> {
    pub(crate) fn new(entries: &'a [RGB8]) -> Self {
        Self { entries }
    }

    #[inline]
    pub(crate) fn resolve(&self, index: u8) -> RGB8 {
        self.entries
            .get(usize::from(index))
            .copied()
            .unwrap_or_default()
    }
}

/// Maps palette indices to alpha through a transparency table.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AlphaSynthesizer<'a> {
    table: &'a [u8],
}

impl<'a> AlphaSynthesizer<'a> {
    /// `count` is the declared number of entries; it is clamped to the table length.
    pub(crate) fn new(table: &'a [u8], count: usize) -> Self {
        Self {
            table: &table[..count.min(table.len())],
        }
    }

    /// `table[index]` when `index < count`, else opaque.
    #[inline]
    pub(crate) fn alpha(&self, index: u8) -> u8 {
        self.table.get(usize::from(index)).copied().unwrap_or(0xFF)
    }

    /// Overwrite the alpha byte of each already-converted pixel in `dst`.
    pub(crate) fn apply(
        &self,
        indices: impl Iterator<Item = u8>,
        dst: &mut [u8],
        order: ChannelOrder,
    ) {
        for (index, px) in indices.zip(dst.chunks_exact_mut(4)) {
            px[order.alpha()] = self.alpha(index);
        }
    }
}
