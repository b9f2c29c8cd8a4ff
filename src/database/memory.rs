use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Board, Todo, User, UserProfile};
use super::repository::{BoardRepository, TodoRepository, UserRepository};

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    boards: HashMap<Uuid, Board>,
    todos: HashMap<Uuid, Todo>,
}

/// In-process store for tests and `--memory` runs. Cloning shares the data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of todos attached to a board regardless of owner
    pub async fn todo_count_for_board(&self, board_id: Uuid) -> usize {
        let data = self.inner.read().await;
        data.todos.values().filter(|t| t.board_id == board_id).count()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn upsert(&self, profile: UserProfile) -> Result<User, DatabaseError> {
        let mut data = self.inner.write().await;
        let existing = data.users.remove(&profile.uid);
        let user = User::merge_profile(existing, profile);
        data.users.insert(user.uid.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data.users.get(uid).cloned())
    }
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn list_owned(&self, owner: &str) -> Result<Vec<Board>, DatabaseError> {
        let data = self.inner.read().await;
        let mut boards: Vec<Board> = data
            .boards
            .values()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Option<Board>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data.boards.get(&id).filter(|b| b.user_id == owner).cloned())
    }

    async fn insert(&self, board: Board) -> Result<Board, DatabaseError> {
        let mut data = self.inner.write().await;
        data.boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn save(&self, board: &Board) -> Result<Option<Board>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(stored) = data.boards.get_mut(&board.id).filter(|b| b.user_id == board.user_id) else {
            return Ok(None);
        };
        stored.title = board.title.clone();
        stored.description = board.description.clone();
        stored.color = board.color.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        let owned = data.boards.get(&id).map_or(false, |b| b.user_id == owner);
        if owned {
            data.boards.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn list_for_board(&self, board_id: Uuid, owner: &str) -> Result<Vec<Todo>, DatabaseError> {
        let data = self.inner.read().await;
        let mut todos: Vec<Todo> = data
            .todos
            .values()
            .filter(|t| t.board_id == board_id && t.user_id == owner)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data.todos.get(&id).filter(|t| t.user_id == owner).cloned())
    }

    async fn insert(&self, todo: Todo) -> Result<Todo, DatabaseError> {
        let mut data = self.inner.write().await;
        data.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn save(&self, todo: &Todo) -> Result<Option<Todo>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(stored) = data.todos.get_mut(&todo.id).filter(|t| t.user_id == todo.user_id) else {
            return Ok(None);
        };
        stored.title = todo.title.clone();
        stored.description = todo.description.clone();
        stored.priority = todo.priority;
        stored.completed = todo.completed;
        stored.due_date = todo.due_date;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn toggle_owned(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(stored) = data.todos.get_mut(&id).filter(|t| t.user_id == owner) else {
            return Ok(None);
        };
        stored.completed = !stored.completed;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        let owned = data.todos.get(&id).map_or(false, |t| t.user_id == owner);
        if owned {
            data.todos.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_for_board(&self, board_id: Uuid) -> Result<u64, DatabaseError> {
        let mut data = self.inner.write().await;
        let before = data.todos.len();
        data.todos.retain(|_, t| t.board_id != board_id);
        Ok((before - data.todos.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Priority;
    use chrono::Duration;

    fn board(owner: &str, title: &str) -> Board {
        Board::new(owner, title.to_string(), String::new(), Board::DEFAULT_COLOR.to_string())
    }

    fn todo(owner: &str, board_id: Uuid, title: &str) -> Todo {
        Todo::new(owner, board_id, title.to_string(), String::new(), Priority::Medium, None)
    }

    #[tokio::test]
    async fn boards_list_newest_first_and_only_for_owner() {
        let store = MemoryStore::new();
        let mut older = board("alice", "Old");
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = board("alice", "New");
        let foreign = board("bob", "Bob's");

        BoardRepository::insert(&store, older.clone()).await.unwrap();
        BoardRepository::insert(&store, newer.clone()).await.unwrap();
        BoardRepository::insert(&store, foreign).await.unwrap();

        let listed = store.list_owned("alice").await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn ownership_mismatch_looks_like_absence() {
        let store = MemoryStore::new();
        let b = BoardRepository::insert(&store, board("alice", "Work")).await.unwrap();

        assert!(BoardRepository::find_owned(&store, b.id, "bob").await.unwrap().is_none());
        assert!(!BoardRepository::delete_owned(&store, b.id, "bob").await.unwrap());
        assert!(BoardRepository::find_owned(&store, b.id, "alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_refuses_foreign_owner() {
        let store = MemoryStore::new();
        let b = BoardRepository::insert(&store, board("alice", "Work")).await.unwrap();

        let mut hijack = b.clone();
        hijack.user_id = "bob".into();
        hijack.title = "Mine now".into();
        assert!(BoardRepository::save(&store, &hijack).await.unwrap().is_none());

        let stored = BoardRepository::find_owned(&store, b.id, "alice").await.unwrap().unwrap();
        assert_eq!(stored.title, "Work");
    }

    #[tokio::test]
    async fn toggle_flips_only_completed() {
        let store = MemoryStore::new();
        let t = TodoRepository::insert(&store, todo("alice", Uuid::new_v4(), "Ship")).await.unwrap();

        let once = store.toggle_owned(t.id, "alice").await.unwrap().unwrap();
        assert!(once.completed);
        let twice = store.toggle_owned(t.id, "alice").await.unwrap().unwrap();
        assert!(!twice.completed);
        assert_eq!(twice.title, t.title);
        assert_eq!(twice.priority, t.priority);
        assert!(store.toggle_owned(t.id, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_for_board_leaves_other_boards_alone() {
        let store = MemoryStore::new();
        let keep = Uuid::new_v4();
        let doomed = Uuid::new_v4();
        TodoRepository::insert(&store, todo("alice", doomed, "a")).await.unwrap();
        TodoRepository::insert(&store, todo("alice", doomed, "b")).await.unwrap();
        TodoRepository::insert(&store, todo("alice", keep, "c")).await.unwrap();

        assert_eq!(store.delete_for_board(doomed).await.unwrap(), 2);
        assert_eq!(store.todo_count_for_board(doomed).await, 0);
        assert_eq!(store.todo_count_for_board(keep).await, 1);
    }

    #[tokio::test]
    async fn upsert_updates_in_place() {
        let store = MemoryStore::new();
        let profile = |email: Option<&str>, verified| UserProfile {
            uid: "alice".into(),
            email: email.map(String::from),
            display_name: None,
            email_verified: verified,
        };

        store.upsert(profile(Some("a@example.com"), false)).await.unwrap();
        let user = store.upsert(profile(None, true)).await.unwrap();
        assert_eq!(user.email, "a@example.com");
        assert!(user.email_verified);
        assert_eq!(store.find_by_uid("alice").await.unwrap(), Some(user));
    }
}
