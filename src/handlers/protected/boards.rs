use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::api::{CreateBoardRequest, UpdateBoardRequest};
use crate::database::models::Board;
use crate::error::{ApiError, DatabaseResultExt};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

/// Owned board by raw path id; a malformed id is just another 404
pub(super) async fn find_board(
    state: &AppState,
    id: &str,
    owner: &str,
    failure: &'static str,
) -> Result<Board, ApiError> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Err(ApiError::not_found("Board not found"));
    };

    state
        .boards
        .find_owned(id, owner)
        .await
        .or_internal(failure)?
        .ok_or_else(|| ApiError::not_found("Board not found"))
}

/// GET /api/boards - caller's boards, newest first
pub async fn list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Board>> {
    let boards = state
        .boards
        .list_owned(&user.uid)
        .await
        .or_internal("Failed to fetch boards")?;
    Ok(ApiResponse::ok(boards))
}

/// GET /api/boards/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Board> {
    let board = find_board(&state, &id, &user.uid, "Failed to fetch board").await?;
    Ok(ApiResponse::ok(board))
}

/// POST /api/boards
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> ApiResult<Board> {
    let Json(request) = payload?;
    let board = request.into_board(&user.uid)?;

    let board = state.boards.insert(board).await.or_internal("Failed to create board")?;
    tracing::info!(uid = %user.uid, board = %board.id, "Created board");
    Ok(ApiResponse::created(board))
}

/// PUT /api/boards/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBoardRequest>, JsonRejection>,
) -> ApiResult<Board> {
    let Json(request) = payload?;
    let mut board = find_board(&state, &id, &user.uid, "Failed to update board").await?;
    request.apply(&mut board)?;

    let board = state
        .boards
        .save(&board)
        .await
        .or_internal("Failed to update board")?
        .ok_or_else(|| ApiError::not_found("Board not found"))?;
    Ok(ApiResponse::ok(board))
}

/// DELETE /api/boards/:id - removes the board's todos, then the board.
/// Not transactional: a failure between the steps leaves the board with
/// fewer todos, and retrying the delete finishes the job.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let board = find_board(&state, &id, &user.uid, "Failed to delete board").await?;

    let removed = state
        .todos
        .delete_for_board(board.id)
        .await
        .or_internal("Failed to delete board")?;

    let deleted = state
        .boards
        .delete_owned(board.id, &user.uid)
        .await
        .or_internal("Failed to delete board")?;
    if !deleted {
        tracing::warn!(uid = %user.uid, board = %board.id, "Board vanished before it could be deleted");
    }

    tracing::info!(uid = %user.uid, board = %board.id, todos = removed, "Deleted board");
    Ok(ApiResponse::ok(Message::new("Board and associated todos deleted successfully")))
}
