//! Retry module (ergonomic namespace)
//! - policy.rs: delay-gated retry of whole sequencing passes

pub mod policy;

pub use policy::*;
