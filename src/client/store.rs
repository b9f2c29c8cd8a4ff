//! View state for the board screens.
//!
//! State only changes through [`reduce`]; callers perform the HTTP request,
//! then dispatch the action describing what the server returned. Entities
//! are kept normalized by id with a separate display order.

use std::collections::HashMap;

use uuid::Uuid;

use super::filter::TodoFilter;
use crate::database::models::{Board, Todo};

#[derive(Debug, Clone)]
pub enum Action {
    BoardsLoaded(Vec<Board>),
    BoardCreated(Board),
    BoardUpdated(Board),
    BoardDeleted(Uuid),
    TodosLoaded { board_id: Uuid, todos: Vec<Todo> },
    TodoCreated(Todo),
    TodoUpdated(Todo),
    TodoDeleted(Uuid),
    FilterChanged(TodoFilter),
    /// A request failed; the message is shown inline until the next success
    RequestFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    boards: HashMap<Uuid, Board>,
    board_order: Vec<Uuid>,
    todos: HashMap<Uuid, Todo>,
    todo_order: Vec<Uuid>,
    pub filter: TodoFilter,
    pub error: Option<String>,
}

impl BoardState {
    pub fn boards(&self) -> Vec<&Board> {
        self.board_order.iter().filter_map(|id| self.boards.get(id)).collect()
    }

    pub fn board(&self, id: Uuid) -> Option<&Board> {
        self.boards.get(&id)
    }

    pub fn todos_for(&self, board_id: Uuid) -> Vec<&Todo> {
        self.todo_order
            .iter()
            .filter_map(|id| self.todos.get(id))
            .filter(|t| t.board_id == board_id)
            .collect()
    }

    /// Todos of a board after the current filter
    pub fn visible_todos(&self, board_id: Uuid) -> Vec<&Todo> {
        self.filter.apply(self.todos_for(board_id))
    }

    /// (completed, total) for a board
    pub fn progress(&self, board_id: Uuid) -> (usize, usize) {
        let todos = self.todos_for(board_id);
        let done = todos.iter().filter(|t| t.completed).count();
        (done, todos.len())
    }
}

pub fn reduce(mut state: BoardState, action: Action) -> BoardState {
    if !matches!(action, Action::RequestFailed(_) | Action::FilterChanged(_)) {
        state.error = None;
    }

    match action {
        Action::BoardsLoaded(boards) => {
            state.board_order = boards.iter().map(|b| b.id).collect();
            state.boards = boards.into_iter().map(|b| (b.id, b)).collect();
        }
        Action::BoardCreated(board) => {
            state.board_order.retain(|id| *id != board.id);
            state.board_order.insert(0, board.id);
            state.boards.insert(board.id, board);
        }
        Action::BoardUpdated(board) => {
            if !state.boards.contains_key(&board.id) {
                state.board_order.insert(0, board.id);
            }
            state.boards.insert(board.id, board);
        }
        Action::BoardDeleted(id) => {
            state.boards.remove(&id);
            state.board_order.retain(|b| *b != id);
            state.todos.retain(|_, t| t.board_id != id);
            let todos = &state.todos;
            state.todo_order.retain(|t| todos.contains_key(t));
        }
        Action::TodosLoaded { board_id, todos } => {
            state.todos.retain(|_, t| t.board_id != board_id);
            let remaining = &state.todos;
            state.todo_order.retain(|t| remaining.contains_key(t));
            state.todo_order.extend(todos.iter().map(|t| t.id));
            state.todos.extend(todos.into_iter().map(|t| (t.id, t)));
        }
        Action::TodoCreated(todo) => {
            state.todo_order.retain(|id| *id != todo.id);
            state.todo_order.insert(0, todo.id);
            state.todos.insert(todo.id, todo);
        }
        Action::TodoUpdated(todo) => {
            if !state.todos.contains_key(&todo.id) {
                state.todo_order.insert(0, todo.id);
            }
            state.todos.insert(todo.id, todo);
        }
        Action::TodoDeleted(id) => {
            state.todos.remove(&id);
            state.todo_order.retain(|t| *t != id);
        }
        Action::FilterChanged(filter) => state.filter = filter,
        Action::RequestFailed(message) => state.error = Some(message),
    }

    state
}

/// Owns a [`BoardState`] and applies actions to it
#[derive(Debug, Default)]
pub struct BoardStore {
    state: BoardState,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }
}
