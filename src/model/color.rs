use serde::{Deserialize, Serialize};

/// Packed 32-bit colour in `0xAARRGGBB` layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgbColor(pub u32);

impl ArgbColor {
    pub const RED: Self = Self(0xFFFF_0000);
    pub const GREEN: Self = Self(0xFF00_FF00);
    pub const BLUE: Self = Self(0xFF00_00FF);
    pub const YELLOW: Self = Self(0xFFFF_FF00);
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const BLACK: Self = Self(0xFF00_0000);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same colour with a different alpha
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    /// Straight (non-premultiplied) RGBA bytes
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }
}

impl Default for ArgbColor {
    fn default() -> Self {
        Self::RED
    }
}

/// Colours offered by the properties dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteColor {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
}

impl PaletteColor {
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    pub fn argb(self) -> ArgbColor {
        match self {
            Self::Red => ArgbColor::RED,
            Self::Green => ArgbColor::GREEN,
            Self::Blue => ArgbColor::BLUE,
            Self::Yellow => ArgbColor::YELLOW,
        }
    }

    /// Palette entry for a stored colour. Colours outside the palette map to red.
    pub fn from_argb(color: ArgbColor) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.argb() == color)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_accessors() {
        let c = ArgbColor(0x80_10_20_30);
        assert_eq!(c.alpha(), 0x80);
        assert_eq!(c.red(), 0x10);
        assert_eq!(c.green(), 0x20);
        assert_eq!(c.blue(), 0x30);
        assert_eq!(c.to_rgba(), [0x10, 0x20, 0x30, 0x80]);
    }

    #[test]
    fn test_from_argb_packs_channels() {
        assert_eq!(ArgbColor::from_argb(255, 255, 0, 0), ArgbColor::RED);
        assert_eq!(ArgbColor::YELLOW.with_alpha(150).alpha(), 150);
        assert_eq!(ArgbColor::YELLOW.with_alpha(150).red(), 255);
    }

    #[test]
    fn test_palette_round_trip_and_unknown() {
        for entry in PaletteColor::ALL {
            assert_eq!(PaletteColor::from_argb(entry.argb()), entry);
        }
        assert_eq!(
            PaletteColor::from_argb(ArgbColor(0xFF12_3456)),
            PaletteColor::Red
        );
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&ArgbColor::BLUE).unwrap();
        assert_eq!(json, "4278190335");
    }
}
