//! The standardized response envelope: outcome codes, the canonical body
//! shape, and the normalizer that keeps every outgoing response in it.

pub mod body;
pub mod codes;
pub mod normalize;

pub use body::{Envelope, EnvelopeBuilder, EnvelopeError, RESERVED_FIELDS};
pub use codes::{Errcode, Namespace, UnknownCode};
pub use normalize::{is_standard, normalize};
