// handlers/public/mod.rs - Public handlers (no session required)
//
// Health probing and session acquisition. Everything here must work for an
// anonymous visitor.
pub mod health;
pub mod session;

pub use health::{health, root};
pub use session::{session_create, session_destroy, sign_in};
