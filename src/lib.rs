//! Starlane codec library.
//!
//! The translation layer between a Binary Homeworlds rules engine and a
//! fixed-interface neural policy/value model. Encodes immutable game-state
//! snapshots into the model's 40-token index sequence, maps the 338-wide
//! policy head to and from concrete actions (folding the symmetry of
//! interchangeable pieces into canonical representatives), and interprets
//! the value head. Legality and rule resolution stay behind the
//! [`rules::RulesEngine`] seam; every codec call is a pure function of its
//! inputs and safe to run from any number of self-play workers.

pub mod board;
pub mod eval;
pub mod nn;
pub mod rules;
