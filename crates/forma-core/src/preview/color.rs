//! Filament colours offered at configuration time

/// Colour used when a requested name is not in the palette
pub const FALLBACK_COLOR: u32 = 0x3b82f6;

/// Filament colours the storefront sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrintColor {
    White,
    Black,
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Gray,
}

impl PrintColor {
    /// Every colour, in the order shown to customers
    pub const ALL: [PrintColor; 9] = [
        Self::White,
        Self::Black,
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Orange,
        Self::Purple,
        Self::Gray,
    ];

    /// Look up a colour by display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::Gray => "Gray",
        }
    }

    /// 0xRRGGBB value used for the preview material
    pub fn hex(&self) -> u32 {
        match self {
            Self::White => 0xffffff,
            Self::Black => 0x000000,
            Self::Red => 0xff0000,
            Self::Blue => 0x0000ff,
            Self::Green => 0x00ff00,
            Self::Yellow => 0xffff00,
            Self::Orange => 0xffa500,
            Self::Purple => 0x800080,
            Self::Gray => 0x808080,
        }
    }

    /// sRGB components in 0.0..=1.0
    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.hex())
    }
}

/// Preview colour for a configured name, falling back for unknown names
pub fn preview_color(name: &str) -> u32 {
    PrintColor::from_name(name).map_or(FALLBACK_COLOR, |c| c.hex())
}

fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [(hex >> 16) & 0xff, (hex >> 8) & 0xff, hex & 0xff].map(|c| c as f32 / 255.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(PrintColor::from_name("Orange"), Some(PrintColor::Orange));
        assert_eq!(PrintColor::from_name(" gray "), Some(PrintColor::Gray));
        assert_eq!(PrintColor::from_name("Magenta"), None);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(preview_color("Purple"), 0x800080);
        assert_eq!(preview_color("Chartreuse"), FALLBACK_COLOR);
        assert_eq!(preview_color(""), FALLBACK_COLOR);
        // Black is a real palette entry, not a missing one
        assert_eq!(preview_color("Black"), 0x000000);
    }

    #[test]
    fn test_rgb() {
        assert_eq!(PrintColor::White.rgb(), [1.0, 1.0, 1.0]);
        assert_eq!(PrintColor::Red.rgb(), [1.0, 0.0, 0.0]);
        assert_eq!(PrintColor::Purple.rgb()[1], 0.0);
    }

    #[test]
    fn test_names_round_trip() {
        for color in PrintColor::ALL {
            assert_eq!(PrintColor::from_name(color.name()), Some(color));
        }
    }
}
