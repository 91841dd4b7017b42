use taskdash::{AuthError, TaskApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Tasks(#[from] TaskApiError),
    #[error("not signed in; run `taskdash sign-in` first")]
    NotSignedIn,
}
