//! Policy-head layout and action decoding.
//!
//! The 338-wide policy head partitions into contiguous family slices; each
//! slot denotes one concrete action. Encoding an action to its slot is a
//! pure injective map. Decoding is the hard direction: many slots denote
//! outcome-equivalent actions (the three identical pyramids of a template
//! are interchangeable, as are ships of one template at one system), so the
//! legal slots are partitioned into outcome-equivalence classes. A class
//! scores the maximum over its members, and the winning class answers with
//! its lowest slot, the canonical representative. Non-canonical slots can
//! never be selected and never receive training-target mass, so the model
//! has no incentive to split probability across symmetric duplicates, and
//! any mass it does leave on a twin still counts for the class.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;

use crate::board::action::Action;
use crate::board::piece::{Color, PieceId, Size, ALL_COLORS};
use crate::board::role::{Player, Role};
use crate::board::snapshot::{Snapshot, SystemRef};
use crate::rules::RulesEngine;

/// Width of the policy head.
pub const HEAD_WIDTH: usize = 338;

/// Family slice bases. Within a slice, slots are ordered by piece id
/// (piece id x3 + color rank for transforms; size x4 + color for
/// homeworld setup).
pub const ATTACK_BASE: u16 = 0;
pub const CONSTRUCT_BASE: u16 = 36;
pub const TRANSFORM_BASE: u16 = 72;
pub const SACRIFICE_BASE: u16 = 180;
pub const MOVE_INIT_BASE: u16 = 216;
pub const MOVE_FINISH_BASE: u16 = 252;
pub const HOMEWORLD_BASE: u16 = 288;
pub const CATASTROPHE_BASE: u16 = 300;
/// The canonical pass slot. Slot 337 is its padding alias: the original
/// 338-entry move table fills 337 entries and leaves the last at pass, so
/// both tail slots denote the same action and decode folds them together.
pub const PASS_INDEX: u16 = 336;

/// Errors from the decode direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The rules engine reported an empty legal set. Propagated to the
    /// caller, who owns game-over handling; never defaulted to pass.
    #[error("no legal action in the current position")]
    NoLegalAction,
}

/// Rank of `target` among the three colors a piece of color `own` can
/// transform into (its own color is excluded from the slice).
fn transform_color_rank(own: Color, target: Color) -> u16 {
    assert!(own != target, "transform to own color is not representable");
    ALL_COLORS
        .iter()
        .filter(|&&c| c != own)
        .position(|&c| c == target)
        .expect("target is one of the three other colors") as u16
}

/// Inverse of [`transform_color_rank`].
fn transform_color_from_rank(own: Color, rank: u16) -> Color {
    *ALL_COLORS
        .iter()
        .filter(|&&c| c != own)
        .nth(rank as usize)
        .expect("rank in 0..3")
}

/// Maps an action to its policy-head slot.
///
/// Pure and injective: `Pass` always maps to [`PASS_INDEX`], never to its
/// padding alias.
pub fn encode_action(action: &Action) -> u16 {
    match *action {
        Action::Attack(p) => ATTACK_BASE + p.raw() as u16,
        Action::Construct(p) => CONSTRUCT_BASE + p.raw() as u16,
        Action::Transform(p, color) => {
            TRANSFORM_BASE + p.raw() as u16 * 3 + transform_color_rank(p.color(), color)
        }
        Action::SacrificeInit(p) => SACRIFICE_BASE + p.raw() as u16,
        Action::MoveInit(p) => MOVE_INIT_BASE + p.raw() as u16,
        Action::MoveFinish(p) => MOVE_FINISH_BASE + p.raw() as u16,
        Action::HomeworldBuild(size, color) => {
            HOMEWORLD_BASE + size as u16 * 4 + color as u16
        }
        Action::Catastrophe(p) => CATASTROPHE_BASE + p.raw() as u16,
        Action::Pass => PASS_INDEX,
    }
}

/// Maps a policy-head slot to the action it denotes. Total over 0..338;
/// the padding alias 337 denotes `Pass` like slot 336.
///
/// # Panics
/// Panics if `index >= 338`.
pub fn action_at(index: u16) -> Action {
    assert!((index as usize) < HEAD_WIDTH, "policy index out of range");
    let piece = |base: u16| PieceId::new((index - base) as u8);
    match index {
        i if i < CONSTRUCT_BASE => Action::Attack(piece(ATTACK_BASE)),
        i if i < TRANSFORM_BASE => Action::Construct(piece(CONSTRUCT_BASE)),
        i if i < SACRIFICE_BASE => {
            let off = index - TRANSFORM_BASE;
            let p = PieceId::new((off / 3) as u8);
            Action::Transform(p, transform_color_from_rank(p.color(), off % 3))
        }
        i if i < MOVE_INIT_BASE => Action::SacrificeInit(piece(SACRIFICE_BASE)),
        i if i < MOVE_FINISH_BASE => Action::MoveInit(piece(MOVE_INIT_BASE)),
        i if i < HOMEWORLD_BASE => Action::MoveFinish(piece(MOVE_FINISH_BASE)),
        i if i < CATASTROPHE_BASE => {
            let off = index - HOMEWORLD_BASE;
            let size = match off / 4 {
                0 => Size::Small,
                1 => Size::Medium,
                _ => Size::Large,
            };
            let color = ALL_COLORS[(off % 4) as usize];
            Action::HomeworldBuild(size, color)
        }
        i if i < PASS_INDEX => Action::Catastrophe(piece(CATASTROPHE_BASE)),
        _ => Action::Pass,
    }
}

/// The signature of a move destination. Two destinations with equal
/// signatures are the same place up to relabeling of interchangeable
/// pieces, so moving the selected ship to either gives the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DestSig {
    /// A bank piece as destination discovers a fresh system; only the
    /// template matters.
    Discovery { color: Color, size: Size },
    /// An existing system: its star templates, home ownership, and the
    /// multiset of ships present.
    System {
        home: Option<Player>,
        stars: Vec<(Color, Size)>,
        ships: Vec<(Player, Color, Size)>,
    },
}

/// Outcome-equivalence class key for one legal slot. Slots with equal keys
/// decode to interchangeable actions; the lowest slot of each class is its
/// canonical representative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EquivKey {
    /// Families whose target is a ship: attack, transform (with target
    /// color), sacrifice, move-init. Ships of one template, one owner, at
    /// one system are interchangeable.
    ShipTarget {
        family: u8,
        color: Color,
        size: Size,
        owner: Player,
        system: SystemRef,
        aux: u8,
    },
    /// Construct: bank pieces of one template are interchangeable.
    BankTemplate { color: Color, size: Size },
    /// Catastrophe removes every piece of one color at one system, so the
    /// trigger's size is irrelevant.
    CatastropheAt { color: Color, system: SystemRef },
    Destination(DestSig),
    /// No symmetry to fold: homeworld setup slots, or a slot whose target
    /// does not match its family's expected role, which is left unmerged
    /// rather than guessed at.
    Singleton(u16),
    Pass,
}

fn system_sig(snapshot: &Snapshot, system: SystemRef) -> DestSig {
    let (home, mut stars) = match system {
        SystemRef::Star(anchor) => (None, vec![(anchor.color(), anchor.size())]),
        SystemRef::Home(player) => (
            Some(player),
            snapshot
                .home_members(player)
                .map(|m| (m.color(), m.size()))
                .collect(),
        ),
    };
    stars.sort_unstable();
    let mut ships: Vec<(Player, Color, Size)> = snapshot
        .ships_at(system)
        .map(|(p, owner)| (owner, p.color(), p.size()))
        .collect();
    ships.sort_unstable();
    DestSig::System { home, stars, ships }
}

/// Computes the equivalence-class key of a legal slot against a snapshot.
fn equiv_key(snapshot: &Snapshot, index: u16) -> EquivKey {
    let ship_target = |family: u8, p: PieceId, aux: u8| match snapshot.role(p) {
        Role::Ship { owner, .. } => match snapshot.ship_system(p) {
            Some(system) => EquivKey::ShipTarget {
                family,
                color: p.color(),
                size: p.size(),
                owner,
                system,
                aux,
            },
            None => EquivKey::Singleton(index),
        },
        _ => EquivKey::Singleton(index),
    };

    match action_at(index) {
        Action::Attack(p) => ship_target(0, p, 0),
        Action::Construct(p) => match snapshot.role(p) {
            Role::Bank => EquivKey::BankTemplate { color: p.color(), size: p.size() },
            _ => EquivKey::Singleton(index),
        },
        Action::Transform(p, color) => ship_target(1, p, color as u8),
        Action::SacrificeInit(p) => ship_target(2, p, 0),
        Action::MoveInit(p) => ship_target(3, p, 0),
        Action::MoveFinish(p) => match snapshot.role(p) {
            Role::Bank => EquivKey::Destination(DestSig::Discovery {
                color: p.color(),
                size: p.size(),
            }),
            Role::Star => EquivKey::Destination(system_sig(snapshot, SystemRef::Star(p))),
            Role::HomeStar(player) => {
                EquivKey::Destination(system_sig(snapshot, SystemRef::Home(player)))
            }
            Role::Ship { .. } => EquivKey::Singleton(index),
        },
        Action::Catastrophe(p) => {
            let system = match snapshot.role(p) {
                Role::Ship { .. } => snapshot.ship_system(p),
                _ => snapshot.anchor_system(p),
            };
            match system {
                Some(system) => EquivKey::CatastropheAt { color: p.color(), system },
                None => EquivKey::Singleton(index),
            }
        }
        Action::HomeworldBuild(..) => EquivKey::Singleton(index),
        Action::Pass => EquivKey::Pass,
    }
}

/// Returns the canonical representatives of the legal set, ascending.
///
/// Each outcome-equivalence class contributes its lowest slot. Duplicate
/// legal indices are tolerated; out-of-range indices are a programming
/// error in the rules engine and fail fast.
pub fn canonical_indices(snapshot: &Snapshot, legal: &[u16]) -> Vec<u16> {
    legal_classes(snapshot, legal, &[0.0; HEAD_WIDTH])
        .into_iter()
        .map(|(index, _)| index)
        .collect()
}

fn finite_score(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

/// Groups the legal slots into outcome-equivalence classes. Returns one
/// `(canonical slot, class score)` pair per class, ascending by canonical
/// slot. A class's score is the maximum over its members, so probability
/// mass a model leaves on a symmetric twin still counts for the class; a
/// non-canonical slot itself can never be selected.
fn legal_classes(snapshot: &Snapshot, legal: &[u16], scores: &[f32]) -> Vec<(u16, f32)> {
    let mut sorted: Vec<u16> = legal.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut by_key: HashMap<EquivKey, usize> = HashMap::with_capacity(sorted.len());
    let mut classes: Vec<(u16, f32)> = Vec::with_capacity(sorted.len());
    for &index in &sorted {
        assert!(
            (index as usize) < HEAD_WIDTH,
            "legal action index out of range: {index}"
        );
        let score = finite_score(scores[index as usize]);
        match by_key.entry(equiv_key(snapshot, index)) {
            Entry::Occupied(slot) => {
                let class = &mut classes[*slot.get()];
                if score > class.1 {
                    class.1 = score;
                }
            }
            Entry::Vacant(slot) => {
                // Ascending iteration makes the first member the lowest:
                // the class's canonical representative.
                slot.insert(classes.len());
                classes.push((index, score));
            }
        }
    }
    classes
}

/// Selects the action from a known legal set: the class with the highest
/// score wins and its canonical representative is returned. Exact score
/// ties break to the lowest canonical slot, so the result is deterministic
/// regardless of floating-point noise elsewhere in the head.
pub fn decode_action_from_legal(
    snapshot: &Snapshot,
    legal: &[u16],
    scores: &[f32],
) -> Result<Action, DecodeError> {
    assert_eq!(scores.len(), HEAD_WIDTH, "policy head must be 338 wide");
    let mut picked: Option<(u16, f32)> = None;
    for (index, score) in legal_classes(snapshot, legal, scores) {
        match picked {
            Some((_, best)) if score <= best => {}
            _ => picked = Some((index, score)),
        }
    }
    match picked {
        Some((index, _)) => Ok(action_at(index)),
        None => Err(DecodeError::NoLegalAction),
    }
}

/// Decodes the policy head into one concrete legal action.
///
/// Asks the rules engine for the legal slots, folds symmetric duplicates,
/// and picks the best canonical representative. Fails with
/// [`DecodeError::NoLegalAction`] when the legal set is empty.
pub fn decode_action<E: RulesEngine>(
    rules: &E,
    snapshot: &Snapshot,
    scores: &[f32],
) -> Result<Action, DecodeError> {
    let legal = rules.legal_action_indices(snapshot);
    decode_action_from_legal(snapshot, &legal, scores)
}

/// Softmax over raw scores at a temperature, in f64 for stability.
fn softmax_weights(scores: &[f32], temperature: f32) -> Vec<f64> {
    let t = temperature as f64;
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = scores
        .iter()
        .map(|&s| ((s as f64 - max) / t).exp())
        .collect();
    let sum: f64 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|e| e / sum).collect()
    } else {
        vec![1.0 / scores.len() as f64; scores.len()]
    }
}

/// Samples an action from the softmax of the canonical representatives'
/// scores at `temperature`, for self-play exploration. A temperature at or
/// below zero degenerates to the deterministic argmax decode. Only
/// canonical representatives can ever be drawn.
pub fn decode_action_sampled_from_legal<R: Rng>(
    snapshot: &Snapshot,
    legal: &[u16],
    scores: &[f32],
    temperature: f32,
    rng: &mut R,
) -> Result<Action, DecodeError> {
    assert_eq!(scores.len(), HEAD_WIDTH, "policy head must be 338 wide");
    if temperature <= 0.0 {
        return decode_action_from_legal(snapshot, legal, scores);
    }

    let classes = legal_classes(snapshot, legal, scores);
    if classes.is_empty() {
        return Err(DecodeError::NoLegalAction);
    }

    let raw: Vec<f32> = classes.iter().map(|&(_, s)| s).collect();
    let weights = softmax_weights(&raw, temperature);

    let draw: f64 = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if draw < cumulative {
            return Ok(action_at(classes[i].0));
        }
    }
    // Rounding left the draw past the last bucket.
    Ok(action_at(classes.last().expect("class set is non-empty").0))
}

/// Sampling decode against a rules engine; see
/// [`decode_action_sampled_from_legal`].
pub fn decode_action_sampled<E: RulesEngine, R: Rng>(
    rules: &E,
    snapshot: &Snapshot,
    scores: &[f32],
    temperature: f32,
    rng: &mut R,
) -> Result<Action, DecodeError> {
    let legal = rules.legal_action_indices(snapshot);
    decode_action_sampled_from_legal(snapshot, &legal, scores, temperature, rng)
}
