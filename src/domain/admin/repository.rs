//! Administrator repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Admin, AdminChanges, AdminSummary, NewAdmin};
use crate::domain::DomainError;

/// Repository trait for administrator storage
#[async_trait]
pub trait AdminRepository: Send + Sync + Debug {
    /// Insert a new administrator. A duplicate email yields `Conflict`.
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DomainError>;

    /// Get an administrator by id (safe projection)
    async fn get(&self, id: i32) -> Result<Option<AdminSummary>, DomainError>;

    /// Exact, case-sensitive email lookup
    async fn get_by_email(&self, email: &str) -> Result<Option<AdminSummary>, DomainError>;

    /// List all administrators (safe projection)
    async fn list(&self) -> Result<Vec<AdminSummary>, DomainError>;

    /// Apply a partial update by id; returns the number of affected rows
    async fn update(&self, id: i32, changes: &AdminChanges) -> Result<u64, DomainError>;

    /// Remove an administrator; returns the number of affected rows
    async fn delete(&self, id: i32) -> Result<u64, DomainError>;

    /// Check if any administrator holds the email
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
