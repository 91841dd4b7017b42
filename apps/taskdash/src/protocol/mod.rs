//! Cognito user-pool protocol client: one POST endpoint, the action named in
//! a header, JSON in and out.

pub mod client;
pub mod transport;
pub mod wire;

pub use client::IdentityClient;
pub use transport::{HttpTransport, IdentityTransport, TransportResponse};
pub use wire::{Action, AuthOutcome, AuthenticationResult, RenewedTokens, SignUpOutcome};
