//! User directory endpoints

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Path, Query, ValidatedJson};
use crate::domain::user::{
    NewUser, PageRequest, SortDirection, SortKey, User, UserChanges, UserPage, UserSort, UserStats,
};

/// Request to register a user
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserDto {
    #[validate(length(
        min = 3,
        max = 30,
        message = "First name must be between 3 and 30 characters long"
    ))]
    pub first_name: String,
    #[validate(length(
        min = 3,
        max = 30,
        message = "Last name must be between 3 and 30 characters long"
    ))]
    pub last_name: String,
    #[validate(range(
        min = 1_000_000,
        max = 99_999_999,
        message = "Identity card must be between 1 million and 99.99 million"
    ))]
    pub dni: i32,
    #[validate(range(min = 1, max = 999, message = "Area code must be between 1 and 999"))]
    pub area_code: i32,
    #[validate(range(
        min = 1_000_000_000i64,
        max = 9_999_999_999i64,
        message = "Phone number must be between 1 billion and 9.999 billion"
    ))]
    pub phone: i64,
    #[validate(email(message = "Email must be a valid email address"))]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
}

impl From<CreateUserDto> for NewUser {
    fn from(dto: CreateUserDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            dni: dto.dni,
            area_code: dto.area_code,
            phone: dto.phone,
            email: dto.email,
            is_deleted: dto.is_deleted.unwrap_or(false),
        }
    }
}

/// Partial user update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct UpdateUserDto {
    #[validate(length(
        min = 3,
        max = 30,
        message = "First name must be between 3 and 30 characters long"
    ))]
    pub first_name: Option<String>,
    #[validate(length(
        min = 3,
        max = 30,
        message = "Last name must be between 3 and 30 characters long"
    ))]
    pub last_name: Option<String>,
    #[validate(range(
        min = 1_000_000,
        max = 99_999_999,
        message = "Identity card must be between 1 million and 99.99 million"
    ))]
    pub dni: Option<i32>,
    #[validate(range(min = 1, max = 999, message = "Area code must be between 1 and 999"))]
    pub area_code: Option<i32>,
    #[validate(range(
        min = 1_000_000_000i64,
        max = 9_999_999_999i64,
        message = "Phone number must be between 1 billion and 9.999 billion"
    ))]
    pub phone: Option<i64>,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
    pub is_deleted: Option<bool>,
}

impl From<UpdateUserDto> for UserChanges {
    fn from(dto: UpdateUserDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            dni: dto.dni,
            area_code: dto.area_code,
            phone: dto.phone,
            email: dto.email,
            is_deleted: dto.is_deleted,
        }
    }
}

/// Listing query string. `limit` and `skip` stay raw strings; unusable
/// values fall back to the defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserListParams {
    pub search: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
    pub sorting_key: Option<SortKey>,
    pub sorting_value: Option<SortDirection>,
}

impl UserListParams {
    fn sort(&self) -> UserSort {
        UserSort::new(self.sorting_key, self.sorting_value)
    }

    fn page(&self) -> PageRequest {
        PageRequest::parse(self.limit.as_deref(), self.skip.as_deref())
    }
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserDto>,
) -> Result<ApiResponse<User>, ApiError> {
    debug!(dni = request.dni, "Creating user");

    let user = state.user_service.create(request.into()).await?;

    Ok(ApiResponse::created(user, "User created"))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<ApiResponse<UserPage>, ApiError> {
    debug!(?params, "Listing users");

    let page = state
        .user_service
        .list(params.search.as_deref(), params.sort(), params.page())
        .await?;

    Ok(ApiResponse::ok(page, "Users found"))
}

/// GET /users/byIdentityNumber
pub async fn list_users_by_identity_card(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<ApiResponse<UserPage>, ApiError> {
    debug!(?params, "Listing users by identity card");

    let page = state
        .user_service
        .list_by_identity_card(params.search.as_deref(), params.sort(), params.page())
        .await?;

    Ok(ApiResponse::ok(page, "Users found"))
}

/// GET /users/newUsersToday
pub async fn new_users_today(
    State(state): State<AppState>,
) -> Result<ApiResponse<UserStats>, ApiError> {
    let stats = state.user_service.new_users_today().await?;
    Ok(ApiResponse::ok(stats, "New users today"))
}

/// GET /users/removedUsers
pub async fn find_removed_users(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let users = state.user_service.find_removed_users().await?;

    if users.is_empty() {
        return Ok(ApiResponse::ok(users, "Users not found").reporting(StatusCode::NOT_FOUND));
    }

    Ok(ApiResponse::ok(users, "Users removed found"))
}

/// PATCH /users/delete/{id}
pub async fn soft_delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<User>, ApiError> {
    debug!(id, "Soft-deleting user");

    let user = state.user_service.soft_delete(id).await?;
    Ok(ApiResponse::ok(user, "User deleted (soft)"))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<User>, ApiError> {
    let user = state.user_service.find_one(id).await?;
    Ok(ApiResponse::ok(user, "User found"))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateUserDto>,
) -> Result<ApiResponse<User>, ApiError> {
    debug!(id, "Updating user");

    let user = state.user_service.update(id, request.into()).await?;
    Ok(ApiResponse::ok(user, "User updated"))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<User>, ApiError> {
    debug!(id, "Deleting user");

    let user = state.user_service.remove(id).await?;
    Ok(ApiResponse::ok(user, "User deleted"))
}
