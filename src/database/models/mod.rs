pub mod board;
pub mod todo;
pub mod user;

pub use board::Board;
pub use todo::{ParsePriorityError, Priority, Todo};
pub use user::{User, UserProfile};
