//! Administrator endpoints

use axum::extract::State;
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::json::{trimmed, trimmed_opt};
use crate::api::types::{ApiError, ApiResponse, Path, ValidatedJson};
use crate::domain::admin::{Admin, AdminSummary};
use crate::infrastructure::admin::{CreateAdminRequest, UpdateAdminRequest};

/// Request to create an administrator
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAdminDto {
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
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 100,
        message = "Password must be between 8 and 100 characters long"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub password: String,
}

/// Partial administrator update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAdminDto {
    #[validate(length(
        min = 3,
        max = 30,
        message = "First name must be between 3 and 30 characters long"
    ))]
    #[serde(default)]
    pub first_name: Option<String>,
    #[validate(length(
        min = 3,
        max = 30,
        message = "Last name must be between 3 and 30 characters long"
    ))]
    #[serde(default)]
    pub last_name: Option<String>,
    #[validate(email(message = "Email is invalid"))]
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(
        min = 8,
        max = 100,
        message = "Password must be between 8 and 100 characters long"
    ))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub password: Option<String>,
}

/// POST /admin
pub async fn create_admin(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAdminDto>,
) -> Result<ApiResponse<Admin>, ApiError> {
    debug!(email = %request.email, "Creating admin");

    let admin = state
        .admin_service
        .create(CreateAdminRequest {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(ApiResponse::created(admin, "Admin created"))
}

/// GET /admin
pub async fn list_admins(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<AdminSummary>>, ApiError> {
    let admins = state.admin_service.find_all().await?;
    Ok(ApiResponse::ok(admins, "Admins found"))
}

/// GET /admin/{id}
pub async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<AdminSummary>, ApiError> {
    let admin = state.admin_service.find_one(id).await?;
    Ok(ApiResponse::ok(admin, "Admin found"))
}

/// PATCH /admin/{id}
pub async fn update_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateAdminDto>,
) -> Result<ApiResponse<AdminSummary>, ApiError> {
    debug!(id, "Updating admin");

    let admin = state
        .admin_service
        .update(
            id,
            UpdateAdminRequest {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password: request.password,
            },
        )
        .await?;

    Ok(ApiResponse::ok(admin, "Admin updated"))
}

/// DELETE /admin/{id}
pub async fn delete_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<AdminSummary>, ApiError> {
    debug!(id, "Deleting admin");

    let admin = state.admin_service.remove(id).await?;
    Ok(ApiResponse::ok(admin, "Admin removed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_trimmed_before_length_check() {
        let dto: CreateAdminDto = serde_json::from_str(
            r#"{"firstName":"Marta","lastName":"Suarez","email":"marta@example.com","password":"   short  "}"#,
        )
        .unwrap();

        assert_eq!(dto.password, "short");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_requires_valid_email() {
        let dto: CreateAdminDto = serde_json::from_str(
            r#"{"firstName":"Marta","lastName":"Suarez","email":"nope","password":"longenough"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());

        let missing = serde_json::from_str::<CreateAdminDto>(
            r#"{"firstName":"Marta","lastName":"Suarez","password":"longenough"}"#,
        );
        assert!(missing.is_err());
    }

    #[test]
    fn test_update_dto_optional_password() {
        let dto: UpdateAdminDto = serde_json::from_str(r#"{"lastName":"Gomez"}"#).unwrap();
        assert!(dto.password.is_none());
        assert!(dto.validate().is_ok());

        let dto: UpdateAdminDto =
            serde_json::from_str(r#"{"password":"  new-password  "}"#).unwrap();
        assert_eq!(dto.password.as_deref(), Some("new-password"));
    }
}
