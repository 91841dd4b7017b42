use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::api::ApiConfig;
use crate::session::manager::SessionManager;
use crate::tasks::error::TaskApiError;
use crate::tasks::models::{Task, TaskCreate, TaskStats, TaskUpdate};

#[derive(Clone)]
pub struct TaskApiClient {
    api: ApiConfig,
    http: reqwest::Client,
    session: Arc<SessionManager>,
}

impl TaskApiClient {
    pub fn new(api: ApiConfig, session: Arc<SessionManager>) -> Self {
        Self::with_client(api, reqwest::Client::new(), session)
    }

    pub fn with_client(api: ApiConfig, http: reqwest::Client, session: Arc<SessionManager>) -> Self {
        Self { api, http, session }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskApiError> {
        let resp = self.send(Method::GET, "/todos", None::<&()>).await?;
        read_json(resp).await
    }

    pub async fn task_stats(&self) -> Result<TaskStats, TaskApiError> {
        let resp = self.send(Method::GET, "/todos/stats", None::<&()>).await?;
        read_json(resp).await
    }

    pub async fn create_task(&self, task: &TaskCreate) -> Result<Task, TaskApiError> {
        let resp = self.send(Method::POST, "/todos", Some(task)).await?;
        read_json(resp).await
    }

    pub async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, TaskApiError> {
        let resp = self
            .send(Method::PATCH, &format!("/todos/{id}"), Some(update))
            .await?;
        read_json(resp).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), TaskApiError> {
        self.send(Method::DELETE, &format!("/todos/{id}"), None::<&()>)
            .await?;
        Ok(())
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, TaskApiError> {
        let token = self
            .session
            .access_token()
            .await
            .ok_or(TaskApiError::NoSession)?;

        let mut req = self
            .http
            .request(method.clone(), self.api.url(path))
            .bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        debug!(%method, path, status = resp.status().as_u16(), "Task service replied");
        check_status(resp.status())?;
        Ok(resp)
    }
}

/// Map a reply status onto the client's error model.
fn check_status(status: StatusCode) -> Result<(), TaskApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(TaskApiError::NoSession);
    }
    if !status.is_success() {
        return Err(TaskApiError::Status {
            status: status.as_u16(),
        });
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, TaskApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| TaskApiError::Decode {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;

    use super::*;
    use crate::config::identity::{ConfigSource, IdentityConfig};
    use crate::protocol::client::IdentityClient;
    use crate::store::MemoryTokenStore;
    use crate::test_support::ScriptedTransport;

    #[test]
    fn test_status_mapping() {
        assert_eq!(check_status(StatusCode::OK), Ok(()));
        assert_eq!(check_status(StatusCode::NO_CONTENT), Ok(()));
        assert_eq!(check_status(StatusCode::CREATED), Ok(()));
        assert_eq!(
            check_status(StatusCode::UNAUTHORIZED),
            Err(TaskApiError::NoSession)
        );
        assert_eq!(
            check_status(StatusCode::NOT_FOUND),
            Err(TaskApiError::Status { status: 404 })
        );
    }

    #[tokio::test]
    async fn test_no_session_short_circuits() {
        let transport = Arc::new(ScriptedTransport::new());
        let config = IdentityConfig::resolve(Some("http://localhost:9229"), None, "pool", "client");
        let identity = IdentityClient::new(transport.clone(), ConfigSource::Fixed(config));
        let session = Arc::new(SessionManager::new(identity, Arc::new(MemoryTokenStore::new())));
        // Nothing listens here; reaching the network would surface as Transport.
        let client = TaskApiClient::new(ApiConfig::new("http://127.0.0.1:9"), session);

        assert_eq!(client.list_tasks().await, Err(TaskApiError::NoSession));
        assert_eq!(client.delete_task("t-1").await, Err(TaskApiError::NoSession));
        assert!(transport.calls().is_empty());
    }
}
