//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// End-user record managed by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Identity-card number, unique across all users
    pub dni: i32,
    pub area_code: i32,
    pub phone: i64,
    pub email: Option<String>,
    /// Soft-delete flag; flagged users only show up in the removed-users view
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Materialize a stored record from insert data
    pub fn from_new(id: i32, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            dni: new_user.dni,
            area_code: new_user.area_code,
            phone: new_user.phone,
            email: new_user.email,
            is_deleted: new_user.is_deleted,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and refresh `updated_at`
    pub fn apply(&mut self, changes: &UserChanges, now: DateTime<Utc>) {
        if let Some(first_name) = &changes.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(dni) = changes.dni {
            self.dni = dni;
        }
        if let Some(area_code) = changes.area_code {
            self.area_code = area_code;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(email) = &changes.email {
            self.email = Some(email.clone());
        }
        if let Some(is_deleted) = changes.is_deleted {
            self.is_deleted = is_deleted;
        }
        self.updated_at = now;
    }
}

/// Data required to insert a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub dni: i32,
    pub area_code: i32,
    pub phone: i64,
    pub email: Option<String>,
    pub is_deleted: bool,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dni: Option<i32>,
    pub area_code: Option<i32>,
    pub phone: Option<i64>,
    pub email: Option<String>,
    pub is_deleted: Option<bool>,
}

impl UserChanges {
    pub fn soft_delete() -> Self {
        Self {
            is_deleted: Some(true),
            ..Self::default()
        }
    }
}
