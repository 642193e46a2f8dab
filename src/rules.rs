//! The boundary to the external rules engine.
//!
//! Legality, rule resolution, and win detection live outside this crate.
//! The codec consumes this trait: it asks for the legal subset of the
//! policy head and hands back exactly one concrete action. It never
//! computes legality and never applies actions itself.

use thiserror::Error;

use crate::board::action::Action;
use crate::board::snapshot::Snapshot;

/// Returned by [`RulesEngine::apply`] when an action is rejected.
///
/// A rejection of an action produced by decode indicates a
/// canonicalization bug and should be treated as fatal in tests; it is
/// never retried inside the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rules engine rejected action '{action}'")]
pub struct IllegalAction {
    pub action: Action,
}

/// External rules engine interface.
///
/// `legal_action_indices` reports the legal subset of the policy head for
/// a snapshot, as indices in 0..338. Implementations must be deterministic
/// for a given snapshot; the codec calls them at most once per decode.
pub trait RulesEngine {
    /// Returns the authoritative current game state.
    fn current_snapshot(&self) -> Snapshot;

    /// Returns the indices of the legal actions for `snapshot`.
    fn legal_action_indices(&self, snapshot: &Snapshot) -> Vec<u16>;

    /// Applies an action, producing the successor snapshot.
    fn apply(&self, snapshot: &Snapshot, action: &Action) -> Result<Snapshot, IllegalAction>;
}
