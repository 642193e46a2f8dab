//! Model inference glue.
//!
//! Bridges encoded snapshots to the ONNX policy/value model. Compiled to a
//! graceful no-op without the `neural` feature.

pub mod neural;

pub use neural::Evaluator;
