use strum::FromRepr;

/// The color of a grid cell, as encoded by the integer codes `0..=4` in grid files.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, FromRepr)]
#[repr(u8)]
pub enum CellColor {
    /// Code 0; pairs with every non-black color.
    #[default]
    White = 0,
    /// Code 1; pairs with red, blue and white.
    Red = 1,
    /// Code 2; pairs with blue, red and white.
    Blue = 2,
    /// Code 3; pairs only with green and white.
    Green = 3,
    /// Code 4; forbidden, pairs with nothing and carries no value.
    Black = 4,
}

impl CellColor {
    /// Whether two colors may be paired. The relation is symmetric.
    pub fn compatible_with(self, other: CellColor) -> bool {
        use CellColor::*;

        match (self, other) {
            (Black, _) | (_, Black) => false,
            (White, _) | (_, White) => true,
            (Green, other) => other == Green,
            (_, Green) => false,
            // red and blue pair freely among themselves
            _ => true,
        }
    }

    pub(crate) fn display_char(self) -> char {
        match self {
            Self::White => 'w',
            Self::Red => 'r',
            Self::Blue => 'b',
            Self::Green => 'g',
            Self::Black => 'k',
        }
    }
}
