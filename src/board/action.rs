//! Concrete game actions and their text notation.
//!
//! An action is built fresh each ply from a snapshot plus the model's
//! policy output, handed to the rules engine, and never retained. The text
//! form (`attack 5`, `transform 3 red`, `homeworld small blue`, ...) exists
//! for logs and tests; it is not a wire protocol.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::piece::{Color, PieceId, Size};

/// One concrete game action.
///
/// Piece-id payloads address physical pieces; `HomeworldBuild` addresses a
/// (size, color) template because the setup head has one slot per template,
/// not per piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Attack the enemy ship `0`.
    Attack(PieceId),
    /// Bring bank piece `0` into play as a new ship.
    Construct(PieceId),
    /// Swap ship `0` for a bank piece of the same size in color `1`.
    Transform(PieceId, Color),
    /// Give up ship `0` to begin a sacrifice sequence.
    SacrificeInit(PieceId),
    /// Select ship `0` for movement.
    MoveInit(PieceId),
    /// Move the selected ship to the system anchored by piece `0`
    /// (a bank piece as destination discovers a new system).
    MoveFinish(PieceId),
    /// During setup, take a bank piece of the given template for the
    /// homeworld (star halves first, then the initial ship).
    HomeworldBuild(Size, Color),
    /// Trigger a catastrophe on the color of piece `0` at its system.
    Catastrophe(PieceId),
    /// End the turn without acting.
    Pass,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack(p) => write!(f, "attack {}", p),
            Action::Construct(p) => write!(f, "construct {}", p),
            Action::Transform(p, c) => write!(f, "transform {} {}", p, c.name()),
            Action::SacrificeInit(p) => write!(f, "sacrifice {}", p),
            Action::MoveInit(p) => write!(f, "moveinit {}", p),
            Action::MoveFinish(p) => write!(f, "movefinish {}", p),
            Action::HomeworldBuild(s, c) => write!(f, "homeworld {} {}", s.name(), c.name()),
            Action::Catastrophe(p) => write!(f, "catastrophe {}", p),
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// Errors that can occur when parsing action notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("empty input")]
    EmptyInput,

    #[error("unknown action verb '{0}'")]
    UnknownVerb(String),

    #[error("invalid piece id '{0}'")]
    InvalidPieceId(String),

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    #[error("unknown size '{0}'")]
    UnknownSize(String),

    #[error("'{verb}' takes {expected} argument(s), got {got}")]
    WrongArity {
        verb: &'static str,
        expected: usize,
        got: usize,
    },
}

fn parse_piece(token: &str) -> Result<PieceId, ParseActionError> {
    token
        .parse::<u8>()
        .ok()
        .and_then(PieceId::try_new)
        .ok_or_else(|| ParseActionError::InvalidPieceId(token.to_string()))
}

fn parse_color(token: &str) -> Result<Color, ParseActionError> {
    Color::from_name(token).ok_or_else(|| ParseActionError::UnknownColor(token.to_string()))
}

fn parse_size(token: &str) -> Result<Size, ParseActionError> {
    Size::from_name(token).ok_or_else(|| ParseActionError::UnknownSize(token.to_string()))
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let (&verb, args) = tokens.split_first().ok_or(ParseActionError::EmptyInput)?;

        let arity = |verb: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ParseActionError::WrongArity { verb, expected, got: args.len() })
            }
        };

        match verb {
            "attack" => {
                arity("attack", 1)?;
                Ok(Action::Attack(parse_piece(args[0])?))
            }
            "construct" => {
                arity("construct", 1)?;
                Ok(Action::Construct(parse_piece(args[0])?))
            }
            "transform" => {
                arity("transform", 2)?;
                Ok(Action::Transform(parse_piece(args[0])?, parse_color(args[1])?))
            }
            "sacrifice" => {
                arity("sacrifice", 1)?;
                Ok(Action::SacrificeInit(parse_piece(args[0])?))
            }
            "moveinit" => {
                arity("moveinit", 1)?;
                Ok(Action::MoveInit(parse_piece(args[0])?))
            }
            "movefinish" => {
                arity("movefinish", 1)?;
                Ok(Action::MoveFinish(parse_piece(args[0])?))
            }
            "homeworld" => {
                arity("homeworld", 2)?;
                Ok(Action::HomeworldBuild(parse_size(args[0])?, parse_color(args[1])?))
            }
            "catastrophe" => {
                arity("catastrophe", 1)?;
                Ok(Action::Catastrophe(parse_piece(args[0])?))
            }
            "pass" => {
                arity("pass", 0)?;
                Ok(Action::Pass)
            }
            other => Err(ParseActionError::UnknownVerb(other.to_string())),
        }
    }
}
