//! Full game-state snapshots.
//!
//! A snapshot is the immutable input to every codec call: one role per
//! piece plus the global flags. Uses a fixed-size array indexed by piece id
//! for O(1) lookup; the whole value is trivially copyable. The rules engine
//! owns all state transitions; the codec treats snapshots as read-only and
//! only builds them directly in tests.

use serde::{Deserialize, Serialize};

use super::flags::BoardFlags;
use super::piece::{PieceId, PIECE_COUNT};
use super::role::{Player, Role};

/// Identifies a star system, unifying the two members of a binary home.
///
/// Ships at a home may anchor to either surviving member piece, so the
/// anchor id alone does not identify the location; this type does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRef {
    /// An ordinary system anchored by a discovered star.
    Star(PieceId),
    /// A player's home binary system.
    Home(Player),
}

/// Complete game state at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Role of each piece, indexed by `PieceId`.
    #[serde(with = "role_array")]
    pub roles: [Role; PIECE_COUNT],
    pub flags: BoardFlags,
}

/// Serde bridge for the role array (serde stops at 32-element arrays).
mod role_array {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::board::piece::PIECE_COUNT;
    use crate::board::role::Role;

    pub fn serialize<S: Serializer>(
        roles: &[Role; PIECE_COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        roles.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[Role; PIECE_COUNT], D::Error> {
        let roles: Vec<Role> = Vec::deserialize(deserializer)?;
        let len = roles.len();
        roles
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"one role per piece"))
    }
}

impl Snapshot {
    /// The pre-game state: every piece in the bank, default flags.
    pub const fn initial() -> Snapshot {
        Snapshot {
            roles: [Role::Bank; PIECE_COUNT],
            flags: BoardFlags::initial(),
        }
    }

    /// Returns the role of a piece.
    pub fn role(&self, piece: PieceId) -> Role {
        self.roles[piece.index()]
    }

    /// Sets the role of a piece. Transition logic belongs to the rules
    /// engine; this is a plain builder for constructing positions.
    pub fn set_role(&mut self, piece: PieceId, role: Role) {
        self.roles[piece.index()] = role;
    }

    /// Interprets a piece as a system anchor, normalizing home members.
    /// Returns `None` for pieces that do not anchor a system.
    pub fn anchor_system(&self, piece: PieceId) -> Option<SystemRef> {
        match self.role(piece) {
            Role::Star => Some(SystemRef::Star(piece)),
            Role::HomeStar(player) => Some(SystemRef::Home(player)),
            _ => None,
        }
    }

    /// Returns the system a ship is located at, or `None` if the piece is
    /// not a ship (or its anchor is stale and no longer a star).
    pub fn ship_system(&self, piece: PieceId) -> Option<SystemRef> {
        match self.role(piece) {
            Role::Ship { system, .. } => self.anchor_system(system),
            _ => None,
        }
    }

    /// Iterates over the ships located at a system, in id order.
    pub fn ships_at(&self, system: SystemRef) -> impl Iterator<Item = (PieceId, Player)> + '_ {
        PieceId::all().filter_map(move |p| match self.role(p) {
            Role::Ship { owner, .. } if self.ship_system(p) == Some(system) => Some((p, owner)),
            _ => None,
        })
    }

    /// Iterates over the surviving members of a player's home binary star,
    /// in id order (two at setup, possibly one later, none once destroyed).
    pub fn home_members(&self, player: Player) -> impl Iterator<Item = PieceId> + '_ {
        PieceId::all().filter(move |&p| self.role(p) == Role::HomeStar(player))
    }

    /// Iterates over the pieces currently in the bank, in id order.
    pub fn bank(&self) -> impl Iterator<Item = PieceId> + '_ {
        PieceId::all().filter(move |&p| self.role(p) == Role::Bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::piece::{Color, Size};

    fn white_ship(system: PieceId) -> Role {
        Role::Ship { owner: Player::White, system }
    }

    #[test]
    fn initial_snapshot_is_all_bank() {
        let snap = Snapshot::initial();
        assert_eq!(snap.bank().count(), PIECE_COUNT);
        assert_eq!(snap.home_members(Player::White).count(), 0);
    }

    #[test]
    fn anchor_normalizes_home_members() {
        let mut snap = Snapshot::initial();
        let m1 = PieceId::from_parts(Color::Yellow, Size::Large, 0);
        let m2 = PieceId::from_parts(Color::Blue, Size::Small, 0);
        snap.set_role(m1, Role::HomeStar(Player::White));
        snap.set_role(m2, Role::HomeStar(Player::White));

        assert_eq!(snap.anchor_system(m1), Some(SystemRef::Home(Player::White)));
        assert_eq!(snap.anchor_system(m2), Some(SystemRef::Home(Player::White)));

        let star = PieceId::from_parts(Color::Red, Size::Small, 0);
        snap.set_role(star, Role::Star);
        assert_eq!(snap.anchor_system(star), Some(SystemRef::Star(star)));
        assert_eq!(snap.anchor_system(PieceId::new(20)), None);
    }

    #[test]
    fn ships_at_home_collect_across_members() {
        let mut snap = Snapshot::initial();
        let m1 = PieceId::new(9);
        let m2 = PieceId::new(27);
        snap.set_role(m1, Role::HomeStar(Player::Black));
        snap.set_role(m2, Role::HomeStar(Player::Black));

        // One ship anchored at each member: both sit at the same home.
        snap.set_role(PieceId::new(0), white_ship(m1));
        snap.set_role(PieceId::new(1), white_ship(m2));

        let at_home: Vec<PieceId> = snap
            .ships_at(SystemRef::Home(Player::Black))
            .map(|(p, _)| p)
            .collect();
        assert_eq!(at_home, vec![PieceId::new(0), PieceId::new(1)]);
    }

    #[test]
    fn ship_system_ignores_stale_anchor() {
        let mut snap = Snapshot::initial();
        // Ship anchored at a piece that is itself still in the bank.
        snap.set_role(PieceId::new(2), white_ship(PieceId::new(10)));
        assert_eq!(snap.ship_system(PieceId::new(2)), None);
    }

    #[test]
    fn bank_shrinks_as_roles_assigned() {
        let mut snap = Snapshot::initial();
        snap.set_role(PieceId::new(8), Role::Star);
        snap.set_role(PieceId::new(9), white_ship(PieceId::new(8)));
        assert_eq!(snap.bank().count(), PIECE_COUNT - 2);
        assert!(snap.bank().all(|p| p != PieceId::new(8) && p != PieceId::new(9)));
    }
}
