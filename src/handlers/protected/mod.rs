// handlers/protected/mod.rs - Protected handlers (session required)
//
// Routes here sit behind `session_middleware`, so a `CurrentUser` is always
// present. No role is required beyond being signed in.
pub mod dashboard;

pub use dashboard::dashboard;
