//! Typed client for the task service. Every call is authorized with the
//! session's access credential.

pub mod client;
pub mod error;
pub mod models;

pub use client::TaskApiClient;
pub use error::TaskApiError;
pub use models::{Task, TaskCreate, TaskStats, TaskStatus, TaskUpdate};
