pub mod manager;

pub use manager::{Clock, Session, SessionManager, SignUpResult};
