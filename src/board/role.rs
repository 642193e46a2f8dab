//! Piece roles and players.
//!
//! A piece never leaves the game; it only changes role. The closed role set
//! has 76 values: bank, discovered star, two home-star memberships, and a
//! ship owned by either player at any of the 36 possible anchor pieces.
//! Each role maps to one row of the embedding vocabulary.

use serde::{Deserialize, Serialize};

use super::piece::{PieceId, PIECE_COUNT};

/// The number of distinct role values (and embedding rows they occupy).
pub const ROLE_VOCAB: usize = 4 + 2 * PIECE_COUNT;

/// A player side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// Returns the other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }
}

/// The role a piece currently occupies.
///
/// Role transitions are owned by the external rules engine; the codec only
/// reads them. A `Ship`'s `system` names the anchor piece of the star
/// system it sits at; ships at a binary home may anchor to either member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// In the bank, available to either player.
    Bank,
    /// Anchors an ordinary discovered star system.
    Star,
    /// One half of a player's home binary star.
    HomeStar(Player),
    /// A ship at the system anchored by `system`.
    Ship { owner: Player, system: PieceId },
}

impl Role {
    /// Returns this role's row in the embedding vocabulary (0..76).
    pub fn embedding_row(self) -> u8 {
        match self {
            Role::Bank => 0,
            Role::Star => 1,
            Role::HomeStar(Player::White) => 2,
            Role::HomeStar(Player::Black) => 3,
            Role::Ship { owner: Player::White, system } => 4 + system.raw(),
            Role::Ship { owner: Player::Black, system } => 4 + PIECE_COUNT as u8 + system.raw(),
        }
    }

    /// Inverse of [`embedding_row`](Self::embedding_row).
    pub fn from_embedding_row(row: u8) -> Option<Role> {
        let ship_base = 4;
        let black_base = ship_base + PIECE_COUNT as u8;
        match row {
            0 => Some(Role::Bank),
            1 => Some(Role::Star),
            2 => Some(Role::HomeStar(Player::White)),
            3 => Some(Role::HomeStar(Player::Black)),
            r if r < black_base => Some(Role::Ship {
                owner: Player::White,
                system: PieceId::new(r - ship_base),
            }),
            r if r < black_base + PIECE_COUNT as u8 => Some(Role::Ship {
                owner: Player::Black,
                system: PieceId::new(r - black_base),
            }),
            _ => None,
        }
    }

    /// True if a piece in this role anchors a star system.
    pub const fn is_star_anchor(self) -> bool {
        matches!(self, Role::Star | Role::HomeStar(_))
    }
}
