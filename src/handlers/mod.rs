// handlers/mod.rs - HTTP handlers grouped by security tier
//
// public/    no authentication (health, service info)
// protected/ bearer token required; the auth gate injects `AuthUser`

pub mod protected;
pub mod public;
