//! The model-facing codec: index-sequence state encoding, policy-head
//! action mapping with symmetry canonicalization, and value-head
//! interpretation.

pub mod encoding;
pub mod policy;
pub mod value;

pub use encoding::{encode_state, SEQ_LEN, VOCAB};
pub use policy::{
    decode_action, decode_action_sampled, encode_action, DecodeError, HEAD_WIDTH,
};
pub use value::decode_value;
