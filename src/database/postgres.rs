use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Board, Todo, User, UserProfile};
use super::repository::{BoardRepository, TodoRepository, UserRepository};

const USER_COLUMNS: &str = "uid, email, display_name, email_verified, created_at, updated_at";
const BOARD_COLUMNS: &str = "id, title, description, color, user_id, created_at, updated_at";
const TODO_COLUMNS: &str =
    "id, title, description, board_id, user_id, priority, completed, due_date, created_at, updated_at";

/// Postgres-backed store. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn upsert(&self, profile: UserProfile) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (uid, email, display_name, email_verified)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4)
             ON CONFLICT (uid) DO UPDATE SET
                email = COALESCE($2, users.email),
                display_name = COALESCE($3, users.display_name),
                email_verified = EXCLUDED.email_verified,
                updated_at = now()
             RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&profile.uid)
            .bind(profile.email.filter(|e| !e.is_empty()))
            .bind(profile.display_name.filter(|n| !n.is_empty()))
            .bind(profile.email_verified)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE uid = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl BoardRepository for PgStore {
    async fn list_owned(&self, owner: &str) -> Result<Vec<Board>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM boards WHERE user_id = $1 ORDER BY created_at DESC",
            BOARD_COLUMNS
        );
        let boards = sqlx::query_as::<_, Board>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(boards)
    }

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Option<Board>, DatabaseError> {
        let sql = format!("SELECT {} FROM boards WHERE id = $1 AND user_id = $2", BOARD_COLUMNS);
        let board = sqlx::query_as::<_, Board>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(board)
    }

    async fn insert(&self, board: Board) -> Result<Board, DatabaseError> {
        let sql = format!(
            "INSERT INTO boards ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = BOARD_COLUMNS
        );
        let board = sqlx::query_as::<_, Board>(&sql)
            .bind(board.id)
            .bind(&board.title)
            .bind(&board.description)
            .bind(&board.color)
            .bind(&board.user_id)
            .bind(board.created_at)
            .bind(board.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(board)
    }

    async fn save(&self, board: &Board) -> Result<Option<Board>, DatabaseError> {
        let sql = format!(
            "UPDATE boards SET title = $3, description = $4, color = $5, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            BOARD_COLUMNS
        );
        let board = sqlx::query_as::<_, Board>(&sql)
            .bind(board.id)
            .bind(&board.user_id)
            .bind(&board.title)
            .bind(&board.description)
            .bind(&board.color)
            .fetch_optional(&self.pool)
            .await?;
        Ok(board)
    }

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TodoRepository for PgStore {
    async fn list_for_board(&self, board_id: Uuid, owner: &str) -> Result<Vec<Todo>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE board_id = $1 AND user_id = $2 ORDER BY created_at DESC",
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(board_id)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn find_owned(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1 AND user_id = $2", TODO_COLUMNS);
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn insert(&self, todo: Todo) -> Result<Todo, DatabaseError> {
        let sql = format!(
            "INSERT INTO todos ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {cols}",
            cols = TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(todo.id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.board_id)
            .bind(&todo.user_id)
            .bind(todo.priority.as_str())
            .bind(todo.completed)
            .bind(todo.due_date)
            .bind(todo.created_at)
            .bind(todo.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn save(&self, todo: &Todo) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            "UPDATE todos SET title = $3, description = $4, priority = $5, completed = $6,
                due_date = $7, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(todo.id)
            .bind(&todo.user_id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.priority.as_str())
            .bind(todo.completed)
            .bind(todo.due_date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn toggle_owned(&self, id: Uuid, owner: &str) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            "UPDATE todos SET completed = NOT completed, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_board(&self, board_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE board_id = $1")
            .bind(board_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
