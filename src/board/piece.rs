//! Piece catalog for the 36 physical pyramids.
//!
//! Every piece has a permanent id in 0..36. The id encodes the piece's
//! attributes: `color = id / 9`, `size = (id % 9) / 3`, `instance = id % 3`,
//! so the three identical pyramids of each color/size occupy consecutive
//! ids. The id ordering is total and is the basis of every tie-break in
//! the codec.

use serde::{Deserialize, Serialize};

/// The number of physical pieces in the game.
pub const PIECE_COUNT: usize = 36;

/// The number of distinct (color, size) piece templates.
pub const TEMPLATE_COUNT: usize = 12;

/// A piece color. Discriminants match the id arithmetic (`color = id / 9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Yellow = 1,
    Green = 2,
    Blue = 3,
}

/// All colors in discriminant order.
pub const ALL_COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

impl Color {
    /// Returns the lowercase display name.
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }

    /// Looks up a color by its lowercase name.
    pub fn from_name(name: &str) -> Option<Color> {
        match name {
            "red" => Some(Color::Red),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            _ => None,
        }
    }
}

/// A piece size. Discriminants match the id arithmetic (`size = (id % 9) / 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

/// All sizes in discriminant order.
pub const ALL_SIZES: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

impl Size {
    /// Returns the lowercase display name.
    pub const fn name(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }

    /// Looks up a size by its lowercase name.
    pub fn from_name(name: &str) -> Option<Size> {
        match name {
            "small" => Some(Size::Small),
            "medium" => Some(Size::Medium),
            "large" => Some(Size::Large),
            _ => None,
        }
    }
}

/// A validated piece id in 0..36.
///
/// The newtype guarantees in-range access everywhere downstream; an
/// out-of-range id is a programming error and fails fast in `new`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct PieceId(u8);

impl TryFrom<u8> for PieceId {
    type Error = String;

    fn try_from(raw: u8) -> Result<PieceId, String> {
        PieceId::try_new(raw).ok_or_else(|| format!("piece id out of range: {raw}"))
    }
}

impl From<PieceId> for u8 {
    fn from(piece: PieceId) -> u8 {
        piece.0
    }
}

impl PieceId {
    /// Creates a piece id.
    ///
    /// # Panics
    /// Panics if `raw >= 36`.
    pub const fn new(raw: u8) -> PieceId {
        assert!(raw < PIECE_COUNT as u8, "piece id out of range");
        PieceId(raw)
    }

    /// Creates a piece id, returning `None` if out of range.
    ///
    /// Use this at ingestion boundaries (parsing, foreign indices); inside
    /// the crate ids are valid by construction.
    pub const fn try_new(raw: u8) -> Option<PieceId> {
        if raw < PIECE_COUNT as u8 {
            Some(PieceId(raw))
        } else {
            None
        }
    }

    /// Returns the raw id value.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns the id as an array index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the piece's color.
    pub const fn color(self) -> Color {
        match self.0 / 9 {
            0 => Color::Red,
            1 => Color::Yellow,
            2 => Color::Green,
            _ => Color::Blue,
        }
    }

    /// Returns the piece's size.
    pub const fn size(self) -> Size {
        match (self.0 % 9) / 3 {
            0 => Size::Small,
            1 => Size::Medium,
            _ => Size::Large,
        }
    }

    /// Returns which of the three identical pyramids this is (0..3).
    pub const fn instance(self) -> u8 {
        self.0 % 3
    }

    /// Inverse lookup: the piece with the given attributes.
    pub const fn from_parts(color: Color, size: Size, instance: u8) -> PieceId {
        assert!(instance < 3, "piece instance out of range");
        PieceId(color as u8 * 9 + size as u8 * 3 + instance)
    }

    /// Iterates over all 36 pieces in id order.
    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..PIECE_COUNT as u8).map(PieceId)
    }

    /// Iterates over the three pieces of one (color, size) template.
    pub fn template(color: Color, size: Size) -> impl Iterator<Item = PieceId> {
        (0..3).map(move |i| PieceId::from_parts(color, size, i))
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_attribute_arithmetic() {
        // First red small, last blue large.
        assert_eq!(PieceId::new(0).color(), Color::Red);
        assert_eq!(PieceId::new(0).size(), Size::Small);
        assert_eq!(PieceId::new(0).instance(), 0);
        assert_eq!(PieceId::new(35).color(), Color::Blue);
        assert_eq!(PieceId::new(35).size(), Size::Large);
        assert_eq!(PieceId::new(35).instance(), 2);

        // The three red mediums are ids 3, 4, 5.
        for raw in 3..=5u8 {
            let p = PieceId::new(raw);
            assert_eq!(p.color(), Color::Red);
            assert_eq!(p.size(), Size::Medium);
        }
        assert_eq!(PieceId::new(4).instance(), 1);
    }

    #[test]
    fn from_parts_roundtrip() {
        for p in PieceId::all() {
            assert_eq!(PieceId::from_parts(p.color(), p.size(), p.instance()), p);
        }
    }

    #[test]
    fn try_new_bounds() {
        assert_eq!(PieceId::try_new(35), Some(PieceId::new(35)));
        assert_eq!(PieceId::try_new(36), None);
        assert_eq!(PieceId::try_new(255), None);
    }

    #[test]
    fn template_pieces_share_attributes() {
        let ids: Vec<PieceId> = PieceId::template(Color::Green, Size::Large).collect();
        assert_eq!(ids.len(), 3);
        for p in &ids {
            assert_eq!(p.color(), Color::Green);
            assert_eq!(p.size(), Size::Large);
        }
        // Consecutive ids, ascending.
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn all_covers_every_template_thrice() {
        let mut counts = [0usize; TEMPLATE_COUNT];
        for p in PieceId::all() {
            counts[p.color() as usize * 3 + p.size() as usize] += 1;
        }
        assert!(counts.iter().all(|&c| c == 3));
    }

    #[test]
    fn color_size_name_roundtrip() {
        for c in ALL_COLORS {
            assert_eq!(Color::from_name(c.name()), Some(c));
        }
        for s in ALL_SIZES {
            assert_eq!(Size::from_name(s.name()), Some(s));
        }
        assert_eq!(Color::from_name("purple"), None);
        assert_eq!(Size::from_name("huge"), None);
    }
}
