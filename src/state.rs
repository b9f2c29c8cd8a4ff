use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::AppConfig;
use crate::database::{BoardRepository, TodoRepository, UserRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub boards: Arc<dyn BoardRepository>,
    pub todos: Arc<dyn TodoRepository>,
    /// `None` when no provider is configured; protected routes then answer 503
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state around one store implementing every repository
    pub fn new<S>(store: Arc<S>, identity: Option<Arc<dyn IdentityProvider>>, config: AppConfig) -> Self
    where
        S: UserRepository + BoardRepository + TodoRepository + 'static,
    {
        Self {
            users: store.clone(),
            boards: store.clone(),
            todos: store,
            identity,
            config: Arc::new(config),
        }
    }
}
