use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::boards::find_board;
use crate::api::{CreateTodoRequest, UpdateTodoRequest};
use crate::database::models::Todo;
use crate::error::{ApiError, DatabaseResultExt};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

fn todo_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Todo not found"))
}

async fn find_todo(state: &AppState, id: &str, owner: &str, failure: &'static str) -> Result<Todo, ApiError> {
    state
        .todos
        .find_owned(todo_id(id)?, owner)
        .await
        .or_internal(failure)?
        .ok_or_else(|| ApiError::not_found("Todo not found"))
}

/// GET /api/todos/board/:boardId - todos of one owned board, newest first
pub async fn list_for_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(board_id): Path<String>,
) -> ApiResult<Vec<Todo>> {
    let board = find_board(&state, &board_id, &user.uid, "Failed to fetch todos").await?;

    let todos = state
        .todos
        .list_for_board(board.id, &user.uid)
        .await
        .or_internal("Failed to fetch todos")?;
    Ok(ApiResponse::ok(todos))
}

/// GET /api/todos/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    let todo = find_todo(&state, &id, &user.uid, "Failed to fetch todo").await?;
    Ok(ApiResponse::ok(todo))
}

/// POST /api/todos - the target board must belong to the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(request) = payload?;
    let draft = request.validate()?;

    let board = match draft.board_id {
        Some(board_id) => state
            .boards
            .find_owned(board_id, &user.uid)
            .await
            .or_internal("Failed to create todo")?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found("Board not found"))?;

    let todo = draft.into_todo(&user.uid, board.id);
    let todo = state.todos.insert(todo).await.or_internal("Failed to create todo")?;
    tracing::info!(uid = %user.uid, board = %board.id, todo = %todo.id, "Created todo");
    Ok(ApiResponse::created(todo))
}

/// PUT /api/todos/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(request) = payload?;
    let mut todo = find_todo(&state, &id, &user.uid, "Failed to update todo").await?;
    request.apply(&mut todo)?;

    let todo = state
        .todos
        .save(&todo)
        .await
        .or_internal("Failed to update todo")?
        .ok_or_else(|| ApiError::not_found("Todo not found"))?;
    Ok(ApiResponse::ok(todo))
}

/// PATCH /api/todos/:id/toggle - flip `completed`
pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    let todo = state
        .todos
        .toggle_owned(todo_id(&id)?, &user.uid)
        .await
        .or_internal("Failed to toggle todo")?
        .ok_or_else(|| ApiError::not_found("Todo not found"))?;
    Ok(ApiResponse::ok(todo))
}

/// DELETE /api/todos/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let deleted = state
        .todos
        .delete_owned(todo_id(&id)?, &user.uid)
        .await
        .or_internal("Failed to delete todo")?;

    if !deleted {
        return Err(ApiError::not_found("Todo not found"));
    }
    Ok(ApiResponse::ok(Message::new("Todo deleted successfully")))
}
