//! Board representation and game-state types.
//!
//! Contains the piece catalog, roles, global flags, snapshots, and the
//! concrete action type with its text notation.

pub mod action;
pub mod flags;
pub mod piece;
pub mod role;
pub mod snapshot;

pub use action::{Action, ParseActionError};
pub use flags::{BoardFlags, SacrificeAbility, FLAG_VOCAB};
pub use piece::{Color, PieceId, Size, ALL_COLORS, ALL_SIZES, PIECE_COUNT, TEMPLATE_COUNT};
pub use role::{Player, Role, ROLE_VOCAB};
pub use snapshot::{Snapshot, SystemRef};
