//! Neural network evaluation via ONNX Runtime.
//!
//! Loads the policy/value ONNX model and runs inference using the `ort`
//! crate. The model consumes the encoded `[batch, 40]` i64 index sequence
//! and produces the `[batch, 338]` policy head plus a `[batch, 1]` value
//! scalar, which is squashed through the value interface. When no model is
//! available, inference returns `None` and callers fall back to whatever
//! policy they have.

#[cfg(feature = "neural")]
use ort::session::{builder::GraphOptimizationLevel, Session};
#[cfg(feature = "neural")]
use std::sync::Mutex;

use crate::board::snapshot::Snapshot;
#[cfg(feature = "neural")]
use crate::nn::encoding::{encode_state, SEQ_LEN};
#[cfg(feature = "neural")]
use crate::nn::policy::HEAD_WIDTH;
#[cfg(feature = "neural")]
use crate::nn::value::decode_value;

/// ONNX model evaluator. Holds one session producing both heads.
pub struct Evaluator {
    #[cfg(feature = "neural")]
    session: Option<Mutex<Session>>,
}

impl Evaluator {
    /// Creates a new evaluator, loading the ONNX model from `model_path`.
    ///
    /// If the model file does not exist or fails to load, the session is
    /// set to None and inference calls return `None`.
    pub fn new(model_path: Option<&str>) -> Self {
        #[cfg(feature = "neural")]
        {
            let session = model_path.and_then(load_session).map(Mutex::new);
            if session.is_some() {
                eprintln!("info string Loaded policy/value ONNX model");
            }
            Evaluator { session }
        }

        #[cfg(not(feature = "neural"))]
        {
            let _ = model_path;
            eprintln!("info string Neural eval disabled (compiled without 'neural' feature)");
            Evaluator {}
        }
    }

    /// Returns true if the model is loaded.
    pub fn has_model(&self) -> bool {
        #[cfg(feature = "neural")]
        {
            self.session.is_some()
        }
        #[cfg(not(feature = "neural"))]
        {
            false
        }
    }

    /// Runs inference on a single position.
    ///
    /// Returns the 338 policy scores and the squashed value in (-1, 1),
    /// or `None` if no model is loaded or inference fails.
    pub fn policy_value(&self, snapshot: &Snapshot) -> Option<(Vec<f32>, f32)> {
        #[cfg(feature = "neural")]
        {
            let mut batch = self.policy_value_batch(&[snapshot])?;
            batch.pop()
        }
        #[cfg(not(feature = "neural"))]
        {
            let _ = snapshot;
            None
        }
    }

    /// Runs inference in batch mode. Returns one (policy, value) pair per
    /// snapshot, or `None` if the model is unavailable or inference fails.
    pub fn policy_value_batch(&self, snapshots: &[&Snapshot]) -> Option<Vec<(Vec<f32>, f32)>> {
        #[cfg(feature = "neural")]
        {
            let mutex = self.session.as_ref()?;
            let mut session = mutex.lock().ok()?;
            run_batch_inference(&mut session, snapshots)
        }
        #[cfg(not(feature = "neural"))]
        {
            let _ = snapshots;
            None
        }
    }
}

/// Loads an ONNX session from a file path. Returns None on failure.
#[cfg(feature = "neural")]
fn load_session(path: &str) -> Option<Session> {
    match Session::builder()
        .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
        .and_then(|b| b.with_intra_threads(4))
        .and_then(|b| b.commit_from_file(path))
    {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!("info string Failed to load ONNX model {}: {}", path, e);
            None
        }
    }
}

/// Runs batched policy/value inference.
#[cfg(feature = "neural")]
fn run_batch_inference(
    session: &mut Session,
    snapshots: &[&Snapshot],
) -> Option<Vec<(Vec<f32>, f32)>> {
    use ndarray::Array2;
    use ort::value::Value;

    let batch_size = snapshots.len();
    if batch_size == 0 {
        return Some(Vec::new());
    }

    let mut tokens: Vec<i64> = Vec::with_capacity(batch_size * SEQ_LEN);
    for snapshot in snapshots {
        tokens.extend(encode_state(snapshot).iter().map(|&t| t as i64));
    }

    let input = Value::from_array(([batch_size, SEQ_LEN], tokens)).ok()?;
    let outputs = session.run(ort::inputs![input]).ok()?;

    let (_shape, policy_data) = outputs[0].try_extract_tensor::<f32>().ok()?;
    let (_shape, value_data) = outputs[1].try_extract_tensor::<f32>().ok()?;
    if value_data.len() < batch_size {
        return None;
    }

    let policies = Array2::from_shape_vec((batch_size, HEAD_WIDTH), policy_data.to_vec()).ok()?;

    let mut results = Vec::with_capacity(batch_size);
    for i in 0..batch_size {
        let policy = policies.row(i).to_vec();
        let value = decode_value(value_data[i]);
        results.push((policy, value));
    }
    Some(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluator_without_model() {
        let eval = Evaluator::new(None);
        assert!(!eval.has_model());
    }

    #[test]
    fn evaluator_missing_path() {
        let eval = Evaluator::new(Some("/nonexistent/starlight.onnx"));
        assert!(!eval.has_model());
    }

    #[test]
    fn fallback_returns_none() {
        let eval = Evaluator::new(None);
        let snap = Snapshot::initial();
        assert!(eval.policy_value(&snap).is_none());
        assert!(eval.policy_value_batch(&[&snap]).is_none());
    }
}
