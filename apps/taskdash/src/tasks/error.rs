use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskApiError {
    /// No usable session, either before the request or reported by the
    /// service as `401`.
    #[error("not signed in")]
    NoSession,
    #[error("API Error: {status}")]
    Status { status: u16 },
    #[error("task service unreachable: {detail}")]
    Transport { detail: String },
    #[error("unreadable task service response: {detail}")]
    Decode { detail: String },
}

impl TaskApiError {
    pub fn code(&self) -> &'static str {
        match self {
            TaskApiError::NoSession => "NO_SESSION",
            TaskApiError::Status { .. } => "API_STATUS",
            TaskApiError::Transport { .. } => "TRANSPORT",
            TaskApiError::Decode { .. } => "DECODE",
        }
    }
}

impl From<reqwest::Error> for TaskApiError {
    fn from(e: reqwest::Error) -> Self {
        TaskApiError::Transport {
            detail: e.to_string(),
        }
    }
}
