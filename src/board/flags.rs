//! Global board flags and their embedding rows.
//!
//! The flags occupy the 15 vocabulary rows after the 76 role rows, packed
//! as four one-hot blocks: turn (2), sacrifice ability (5), sacrifice moves
//! left (4), repetition count (4). The pending-selection flag is carried in
//! the snapshot but has no embedding row of its own; the model observes it
//! through the legal-action mask.

use serde::{Deserialize, Serialize};

use super::role::Player;

/// The number of embedding rows occupied by the flag blocks.
pub const FLAG_VOCAB: usize = 15;

/// Row offsets of the four flag blocks, relative to the first flag row.
const TURN_BLOCK: u8 = 0;
const ABILITY_BLOCK: u8 = 2;
const MOVES_LEFT_BLOCK: u8 = 7;
const REPETITION_BLOCK: u8 = 11;

/// The ability granted by an ongoing sacrifice, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SacrificeAbility {
    None,
    Attack,
    Move,
    Construct,
    Transform,
}

impl SacrificeAbility {
    const fn block_offset(self) -> u8 {
        match self {
            SacrificeAbility::None => 0,
            SacrificeAbility::Attack => 1,
            SacrificeAbility::Move => 2,
            SacrificeAbility::Construct => 3,
            SacrificeAbility::Transform => 4,
        }
    }
}

/// Global game-state flags, owned by the external rules engine.
///
/// The codec re-reads these from every snapshot and never caches them.
/// Counts run 0..=3; larger values clamp to the top row when encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardFlags {
    pub turn: Player,
    pub sacrifice_ability: SacrificeAbility,
    pub sacrifice_moves_left: u8,
    /// A ship has been selected to move and awaits its destination.
    pub selection_active: bool,
    pub repetition_count: u8,
}

impl BoardFlags {
    /// Flags at the start of a game: white to move, nothing pending.
    pub const fn initial() -> BoardFlags {
        BoardFlags {
            turn: Player::White,
            sacrifice_ability: SacrificeAbility::None,
            sacrifice_moves_left: 0,
            selection_active: false,
            repetition_count: 0,
        }
    }

    /// Row of the turn block (relative to the first flag row).
    pub fn turn_row(&self) -> u8 {
        TURN_BLOCK
            + match self.turn {
                Player::White => 0,
                Player::Black => 1,
            }
    }

    /// Row of the sacrifice-ability block.
    pub fn ability_row(&self) -> u8 {
        ABILITY_BLOCK + self.sacrifice_ability.block_offset()
    }

    /// Row of the sacrifice-moves-left block.
    pub fn moves_left_row(&self) -> u8 {
        MOVES_LEFT_BLOCK + self.sacrifice_moves_left.min(3)
    }

    /// Row of the repetition-count block.
    pub fn repetition_row(&self) -> u8 {
        REPETITION_BLOCK + self.repetition_count.min(3)
    }
}

impl Default for BoardFlags {
    fn default() -> Self {
        BoardFlags::initial()
    }
}
