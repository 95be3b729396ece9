pub mod add_role_service;
pub mod remove_role_service;
pub mod role_error;
pub mod user_service;

pub use add_role_service::{AddRoleService, RoleAssigner};
pub use remove_role_service::{RemoveRoleService, RoleRemover};
pub use role_error::RoleError;
pub use user_service::{UserError, UserService};
