//! Directory endpoints: end-users and administrators

pub mod admins;
pub mod users;

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::state::AppState;

/// Create the directory router
pub fn create_directory_router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/byIdentityNumber",
            get(users::list_users_by_identity_card),
        )
        .route("/users/newUsersToday", get(users::new_users_today))
        .route("/users/removedUsers", get(users::find_removed_users))
        .route("/users/delete/{id}", patch(users::soft_delete_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Administrators
        .route("/admin", post(admins::create_admin).get(admins::list_admins))
        .route(
            "/admin/{id}",
            get(admins::get_admin)
                .patch(admins::update_admin)
                .delete(admins::delete_admin),
        )
}
