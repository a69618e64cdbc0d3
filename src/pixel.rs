/// Byte positions of each channel inside one 32-bit destination pixel.
///
/// Every row converter writes through this table, so the same code
/// produces RGBA or BGRA output. Alpha is always the last byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelOrder {
    red: usize,
    green: usize,
    blue: usize,
    alpha: usize,
}

impl ChannelOrder {
    /// `[R, G, B, A]` in memory. The default.
    pub const RGBA: Self = Self {
        red: 0,
        green: 1,
        blue: 2,
        alpha: 3,
    };

    /// `[B, G, R, A]` in memory (Windows DIB / little-endian ARGB word).
    pub const BGRA: Self = Self {
        red: 2,
        green: 1,
        blue: 0,
        alpha: 3,
    };

    /// Byte order implied by declared 24/32-bit masks.
    ///
    /// Masks equal to [`ChannelMasks::for_order`]`(BGRA)` mean BGR(A) bytes;
    /// anything else, undeclared masks included, means RGB(A).
    pub fn from_masks(masks: ChannelMasks) -> Self {
        if masks == ChannelMasks::for_order(Self::BGRA) {
            Self::BGRA
        } else {
            Self::RGBA
        }
    }

    pub const fn red(&self) -> usize {
        self.red
    }

    pub const fn green(&self) -> usize {
        self.green
    }

    pub const fn blue(&self) -> usize {
        self.blue
    }

    pub const fn alpha(&self) -> usize {
        self.alpha
    }

    /// Write one pixel into a 4-byte destination slot.
    #[inline]
    pub(crate) fn write(&self, px: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
        px[self.red] = r;
        px[self.green] = g;
        px[self.blue] = b;
        px[self.alpha] = a;
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        Self::RGBA
    }
}

/// Red/green/blue bit masks of a packed 16/24/32-bit layout.
///
/// All-zero masks mean "not declared".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ChannelMasks {
    /// No masks declared.
    pub const NONE: Self = Self::new(0, 0, 0);
    /// 16-bit 5-6-5.
    pub const RGB565: Self = Self::new(0xF800, 0x07E0, 0x001F);
    /// 16-bit 5-5-5, top bit unused.
    pub const RGB555: Self = Self::new(0x7C00, 0x03E0, 0x001F);

    pub const fn new(red: u32, green: u32, blue: u32) -> Self {
        Self { red, green, blue }
    }

    /// Masks describing a 32-bit pixel (read as a little-endian word) in `order`.
    pub const fn for_order(order: ChannelOrder) -> Self {
        Self {
            red: 0xFF << (order.red * 8),
            green: 0xFF << (order.green * 8),
            blue: 0xFF << (order.blue * 8),
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}
