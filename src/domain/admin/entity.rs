//! Administrator entity and related types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Administrator record as stored, including the password hash
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string - never exposed in serialization
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn from_new(id: i32, new_admin: NewAdmin, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new_admin.first_name,
            last_name: new_admin.last_name,
            email: new_admin.email,
            password: new_admin.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and refresh `updated_at`
    pub fn apply(&mut self, changes: &AdminChanges, now: DateTime<Utc>) {
        if let Some(first_name) = &changes.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            self.password = password_hash.clone();
        }
        self.updated_at = now;
    }

    pub fn summary(&self) -> AdminSummary {
        AdminSummary::from(self)
    }
}

/// Safe projection of an administrator, without credentials
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Admin> for AdminSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            email: admin.email.clone(),
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

/// Data required to insert an administrator; the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}
