//! In-process stand-ins for the identity provider, shared by unit and
//! integration tests.

mod scripted_transport;

pub use scripted_transport::{RecordedCall, ScriptedTransport};
