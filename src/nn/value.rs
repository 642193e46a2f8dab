//! Value-head interpretation.
//!
//! The model's single scalar output is squashed into the open interval
//! (-1, 1) and read as the side-to-move's win-probability estimate: +1
//! means a certain win for the player whose turn it is, -1 a certain loss.

/// The largest f32 strictly below 1; keeps the squashed value inside the
/// open interval even where `tanh` rounds to exactly 1.
const VALUE_LIMIT: f32 = 1.0 - f32::EPSILON / 2.0;

/// Squashes the raw value-head scalar into (-1, 1).
///
/// Monotonic in its input (non-strict once `tanh` saturates) and
/// sign-preserving. Stateless.
pub fn decode_value(raw: f32) -> f32 {
    raw.tanh().clamp(-VALUE_LIMIT, VALUE_LIMIT)
}
