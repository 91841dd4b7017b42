use tracing::{info, warn};

use crate::logging::pii::Redacted;

/// Log a rejected or aborted sign-in.
pub fn sign_in_failed(reason: &str, email: &str) {
    warn!(
        event = "SECURITY_SIGN_IN_FAILED",
        email = %Redacted(email),
        reason,
        "Sign-in failed"
    );
}

/// Log a successful sign-in.
pub fn signed_in(subject_id: &str, email: &str) {
    info!(
        event = "SECURITY_SIGNED_IN",
        subject = subject_id,
        email = %Redacted(email),
        "Session established"
    );
}

/// Log a locally discarded session (refresh failure, unreadable renewal).
pub fn session_invalidated(reason: &str) {
    warn!(
        event = "SECURITY_SESSION_INVALIDATED",
        reason,
        "Stored credentials cleared"
    );
}
