//! Credential model and the unverified claim decoder.

pub mod claims;
pub mod codec;
pub mod credentials;
