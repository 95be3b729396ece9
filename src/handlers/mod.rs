// handlers/mod.rs - Three-tier handler layout
//
// Public (no session) → Protected (session required) → Elevated (super admin)
//
// The tier decides which middleware wraps a route in `app.rs`; handlers in a
// tier may assume the guarantees of its middleware (a `CurrentUser` in
// protected and elevated handlers, super admin rights in elevated ones).
pub mod elevated;
pub mod paths;
pub mod protected;
pub mod public;
