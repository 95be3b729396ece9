// handlers/paths.rs - Route paths shared by handlers, middleware and views

use std::fmt::Display;

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const DASHBOARD: &str = "/dashboard";
pub const SIGN_IN: &str = "/auth/sign_in";
pub const SESSION: &str = "/auth/session";
pub const ADMIN_USERS: &str = "/admin/users";

/// Value of `organization_id` that selects the all-organizations listing.
pub const ALL_ORGANIZATIONS: &str = "admin";

pub fn admin_users(organization_id: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("organization_id", organization_id)
        .finish();
    format!("{}?{}", ADMIN_USERS, query)
}

pub fn edit_admin_user(id: impl Display) -> String {
    format!("{}/{}/edit", ADMIN_USERS, id)
}
