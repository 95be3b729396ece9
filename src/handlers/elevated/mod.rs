// handlers/elevated/mod.rs - Elevated handlers (super admin required)
//
// Routes here sit behind `session_middleware` and then `require_super_admin`.
// Anyone else is redirected to the dashboard before a handler runs, so
// nothing in this tree re-checks roles.
//
// Route Prefix: /admin/*
pub mod users;
