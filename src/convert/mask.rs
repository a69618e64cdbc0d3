//! Channel extraction from packed 16-bit words.

use crate::pixel::ChannelMasks;

/// One colour channel inside a 16-bit word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChannelMask {
    mask: u16,
    shift: u32,
    max: u32,
}

impl ChannelMask {
    /// Derive shift and bit width from a contiguous, non-zero mask.
    pub(crate) const fn from_mask(mask: u16) -> Self {
        debug_assert!(mask != 0, "channel mask must be non-zero");
        let bits = mask.count_ones();
        Self {
            mask,
            shift: mask.trailing_zeros(),
            max: (1u32 << bits) - 1,
        }
    }

    /// `(word & mask) >> shift`, scaled linearly to 0..=255.
    #[inline]
    pub(crate) fn extract(&self, word: u16) -> u8 {
        let v = u32::from((word & self.mask) >> self.shift);
        (v * 255 / self.max) as u8
    }
}

/// The two packed 16-bit layouts the converter understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Layout16 {
    /// 5-6-5, green gets the extra bit.
    Rgb565,
    /// 5-5-5, top bit unused.
    Rgb555,
}

const RGB565: [ChannelMask; 3] = [
    ChannelMask::from_mask(ChannelMasks::RGB565.red as u16),
    ChannelMask::from_mask(ChannelMasks::RGB565.green as u16),
    ChannelMask::from_mask(ChannelMasks::RGB565.blue as u16),
];

const RGB555: [ChannelMask; 3] = [
    ChannelMask::from_mask(ChannelMasks::RGB555.red as u16),
    ChannelMask::from_mask(ChannelMasks::RGB555.green as u16),
    ChannelMask::from_mask(ChannelMasks::RGB555.blue as u16),
];

impl Layout16 {
    /// 565 only on an exact match of all three masks. Everything else,
    /// including undeclared (all-zero) masks, is 555.
    pub(crate) fn detect(masks: ChannelMasks) -> Self {
        if masks == ChannelMasks::RGB565 {
            Self::Rgb565
        } else {
            Self::Rgb555
        }
    }

    /// Red, green, blue extractors.
    pub(crate) fn channels(self) -> &'static [ChannelMask; 3] {
        match self {
            Self::Rgb565 => &RGB565,
            Self::Rgb555 => &RGB555,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_geometry() {
        let g = ChannelMask::from_mask(0x07E0);
        assert_eq!(g.shift, 5);
        assert_eq!(g.max, 63);
        let r = ChannelMask::from_mask(0x7C00);
        assert_eq!(r.shift, 10);
        assert_eq!(r.max, 31);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "channel mask must be non-zero")]
    fn zero_mask_rejected() {
        let _ = ChannelMask::from_mask(0);
    }

    #[test]
    fn extract_scales_integer() {
        let b = ChannelMask::from_mask(0x001F);
        assert_eq!(b.extract(0x001F), 255);
        assert_eq!(b.extract(0x0000), 0);
        // 16 * 255 / 31 = 131 (truncated)
        assert_eq!(b.extract(0x0010), 131);
        let g = ChannelMask::from_mask(0x07E0);
        // 32 * 255 / 63 = 129
        assert_eq!(g.extract(32 << 5), 129);
    }

    #[test]
    fn detect_565_needs_exact_masks() {
        assert_eq!(Layout16::detect(ChannelMasks::RGB565), Layout16::Rgb565);
        assert_eq!(Layout16::detect(ChannelMasks::NONE), Layout16::Rgb555);
        assert_eq!(Layout16::detect(ChannelMasks::RGB555), Layout16::Rgb555);
        assert_eq!(
            Layout16::detect(ChannelMasks::new(0xF800, 0x07E0, 0)),
            Layout16::Rgb555
        );
    }

    #[test]
    fn top_bit_ignored_in_555() {
        let [r, g, b] = Layout16::Rgb555.channels();
        assert_eq!((r.extract(0x8000), g.extract(0x8000), b.extract(0x8000)), (0, 0, 0));
    }
}
