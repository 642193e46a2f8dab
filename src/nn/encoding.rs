//! Snapshot -> index-sequence encoding for model input.
//!
//! Produces the 40-slot sequence of embedding-table rows the model embeds
//! and projects. Layout:
//!   [0:36]  one slot per piece: the piece's role row (0..76)
//!   [36]    turn block row
//!   [37]    sacrifice-ability block row
//!   [38]    sacrifice-moves-left block row
//!   [39]    repetition-count block row
//! The four flag slots address rows 76..91, so the whole vocabulary is
//! 76 + 15 = 91 rows. Embedding lookup, normalization, and projection to
//! model width are the model's responsibility; the encoder's contract ends
//! at the raw index sequence.

use crate::board::flags::FLAG_VOCAB;
use crate::board::piece::PieceId;
use crate::board::role::ROLE_VOCAB;
use crate::board::snapshot::Snapshot;

/// Length of the encoded sequence: 36 piece slots + 4 flag slots.
pub const SEQ_LEN: usize = 40;

/// Number of piece slots.
pub const PIECE_SLOTS: usize = 36;

/// Number of flag slots.
pub const FLAG_SLOTS: usize = SEQ_LEN - PIECE_SLOTS;

/// Embedding vocabulary size: role rows then flag rows.
pub const VOCAB: usize = ROLE_VOCAB + FLAG_VOCAB;

/// First vocabulary row of the flag blocks.
const FLAG_BASE: u8 = ROLE_VOCAB as u8;

/// Encodes a snapshot into the model's input index sequence.
///
/// Pure function of the snapshot: deterministic, idempotent, allocation
/// free. Every returned index is in 0..91.
pub fn encode_state(snapshot: &Snapshot) -> [u8; SEQ_LEN] {
    let mut out = [0u8; SEQ_LEN];

    for piece in PieceId::all() {
        out[piece.index()] = snapshot.role(piece).embedding_row();
    }

    let flags = &snapshot.flags;
    out[PIECE_SLOTS] = FLAG_BASE + flags.turn_row();
    out[PIECE_SLOTS + 1] = FLAG_BASE + flags.ability_row();
    out[PIECE_SLOTS + 2] = FLAG_BASE + flags.moves_left_row();
    out[PIECE_SLOTS + 3] = FLAG_BASE + flags.repetition_row();

    out
}
