use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::api::{CreateBoardRequest, CreateTodoRequest, UpdateBoardRequest, UpdateTodoRequest};
use crate::database::models::{Board, Todo, User};
use crate::handlers::protected::users::RegisterResponse;
use crate::middleware::Message;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Typed client for the task board REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}/api{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        Self::send(self.request(Method::GET, "/health")).await
    }

    // Auth

    pub async fn register(&self) -> Result<RegisterResponse, ClientError> {
        Self::send(self.request(Method::POST, "/auth/register")).await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        Self::send(self.request(Method::GET, "/auth/me")).await
    }

    // Boards

    pub async fn list_boards(&self) -> Result<Vec<Board>, ClientError> {
        Self::send(self.request(Method::GET, "/boards")).await
    }

    pub async fn get_board(&self, id: Uuid) -> Result<Board, ClientError> {
        Self::send(self.request(Method::GET, &format!("/boards/{}", id))).await
    }

    pub async fn create_board(&self, board: &CreateBoardRequest) -> Result<Board, ClientError> {
        Self::send(self.request(Method::POST, "/boards").json(board)).await
    }

    pub async fn update_board(&self, id: Uuid, changes: &UpdateBoardRequest) -> Result<Board, ClientError> {
        Self::send(self.request(Method::PUT, &format!("/boards/{}", id)).json(changes)).await
    }

    pub async fn delete_board(&self, id: Uuid) -> Result<Message, ClientError> {
        Self::send(self.request(Method::DELETE, &format!("/boards/{}", id))).await
    }

    // Todos

    pub async fn todos_for_board(&self, board_id: Uuid) -> Result<Vec<Todo>, ClientError> {
        Self::send(self.request(Method::GET, &format!("/todos/board/{}", board_id))).await
    }

    pub async fn get_todo(&self, id: Uuid) -> Result<Todo, ClientError> {
        Self::send(self.request(Method::GET, &format!("/todos/{}", id))).await
    }

    pub async fn create_todo(&self, todo: &CreateTodoRequest) -> Result<Todo, ClientError> {
        Self::send(self.request(Method::POST, "/todos").json(todo)).await
    }

    pub async fn update_todo(&self, id: Uuid, changes: &UpdateTodoRequest) -> Result<Todo, ClientError> {
        Self::send(self.request(Method::PUT, &format!("/todos/{}", id)).json(changes)).await
    }

    pub async fn toggle_todo(&self, id: Uuid) -> Result<Todo, ClientError> {
        Self::send(self.request(Method::PATCH, &format!("/todos/{}/toggle", id))).await
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<Message, ClientError> {
        Self::send(self.request(Method::DELETE, &format!("/todos/{}", id))).await
    }
}
