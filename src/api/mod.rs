pub mod requests;

pub use requests::{CreateBoardRequest, CreateTodoRequest, UpdateBoardRequest, UpdateTodoRequest};
