use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers::{elevated, paths, protected, public};
use crate::middleware::{require_super_admin, session_middleware};
use crate::state::AppState;

/// Full application router: public, protected and elevated tiers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_user_routes(state.clone()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route(paths::ROOT, get(public::root))
        .route(paths::HEALTH, get(public::health))
        .route(paths::SIGN_IN, get(public::sign_in))
        .route(
            paths::SESSION,
            post(public::session_create).delete(public::session_destroy),
        )
        .route("/auth/session/delete", post(public::session_destroy))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(paths::DASHBOARD, get(protected::dashboard))
        .route_layer(from_fn_with_state(state, session_middleware))
}

fn admin_user_routes(state: AppState) -> Router<AppState> {
    use elevated::users;

    Router::new()
        .route(
            "/admin/users",
            get(users::users_index).post(users::users_create),
        )
        .route("/admin/users/new", get(users::users_new))
        .route("/admin/users/resource_ids", get(users::resource_ids))
        .route(
            "/admin/users/:id",
            post(users::users_update)
                .patch(users::users_update)
                .put(users::users_update)
                .delete(users::users_destroy),
        )
        .route("/admin/users/:id/edit", get(users::users_edit))
        .route("/admin/users/:id/delete", post(users::users_destroy))
        .route("/admin/users/:id/add_role", post(users::add_role))
        .route(
            "/admin/users/:id/remove_role",
            post(users::remove_role).delete(users::remove_role),
        )
        // Layers run bottom-up: the session is resolved before the role check.
        .route_layer(from_fn(require_super_admin))
        .route_layer(from_fn_with_state(state, session_middleware))
}
