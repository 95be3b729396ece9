// handlers/elevated/users/mod.rs - /admin/users/* (super admin only)
//
// Every route here is wrapped by `require_super_admin`, so handlers never
// re-check authorization.

use minijinja::{context, Value};

use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

pub mod create;
pub mod destroy;
pub mod edit;
pub mod form;
pub mod index;
pub mod new;
pub mod resource_ids;
pub mod roles;
pub mod update;

pub use create::users_create;
pub use destroy::users_destroy;
pub use edit::users_edit;
pub use form::UserForm;
pub use index::users_index;
pub use new::users_new;
pub use resource_ids::resource_ids;
pub use roles::{add_role, remove_role};
pub use update::users_update;

/// Load the user named by a path segment; anything unresolvable is a 404.
pub(crate) async fn find_user(state: &AppState, id: &str) -> Result<User, ApiError> {
    let not_found = || ApiError::not_found(format!("Couldn't find User with id {}", id));
    let id: i64 = id.trim().parse().map_err(|_| not_found())?;
    state.store.find_user(id).await?.ok_or_else(not_found)
}

/// Template view of a submitted form; the organization id is numeric so the
/// select can mark the chosen option.
pub(crate) fn form_view(form: &UserForm) -> Value {
    context! {
        name => &form.name,
        email => &form.email,
        organization_id => form.organization_id(),
    }
}
