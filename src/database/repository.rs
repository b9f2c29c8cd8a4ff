//! Store capabilities consumed by the request handlers.
//!
//! Every board and todo lookup takes the caller's uid next to the resource
//! id. A record owned by someone else comes back as `None`, exactly like a
//! missing one, so handlers can only ever answer 404 for either case.

use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Board, Todo, User, UserProfile};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or refresh the caller's user record
    async fn upsert(&self, profile: UserProfile) -> Result<User, DatabaseError>;

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Boards owned by `owner`, newest first
    async fn list_owned(&self, owner: &str) -> Result<Vec<Board>, DatabaseError>;

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Option<Board>, DatabaseError>;

    async fn insert(&self, board: Board) -> Result<Board, DatabaseError>;

    /// Overwrite the mutable fields of a board. `None` if it vanished meanwhile.
    async fn save(&self, board: &Board) -> Result<Option<Board>, DatabaseError>;

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todos of one board belonging to `owner`, newest first
    async fn list_for_board(&self, board_id: Uuid, owner: &str) -> Result<Vec<Todo>, DatabaseError>;

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, DatabaseError>;

    async fn insert(&self, todo: Todo) -> Result<Todo, DatabaseError>;

    /// Overwrite the mutable fields of a todo. `None` if it vanished meanwhile.
    async fn save(&self, todo: &Todo) -> Result<Option<Todo>, DatabaseError>;

    /// Flip `completed` in one store operation
    async fn toggle_owned(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, DatabaseError>;

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError>;

    /// Remove every todo attached to a board, returning how many went
    async fn delete_for_board(&self, board_id: Uuid) -> Result<u64, DatabaseError>;
}
