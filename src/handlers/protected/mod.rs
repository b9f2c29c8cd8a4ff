// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here receives `Extension<AuthUser>` from the auth gate and
// scopes each store call by `user.uid`. A resource owned by someone else is
// reported exactly like a missing one (404).

pub mod boards;
pub mod todos;
pub mod users;
