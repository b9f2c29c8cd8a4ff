//! Client side of the API: a typed HTTP client plus the view state the
//! board screens render from.

pub mod api;
pub mod filter;
pub mod store;

pub use api::{ApiClient, ClientError};
pub use filter::TodoFilter;
pub use store::{reduce, Action, BoardState, BoardStore};
