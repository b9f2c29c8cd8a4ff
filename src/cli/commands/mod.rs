pub mod auth;
pub mod boards;
pub mod todos;
pub mod token;
