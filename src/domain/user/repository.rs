//! User repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{NewUser, User, UserChanges};
use super::query::{PageRequest, RecordScope, UserFilter, UserSort};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Insert a new user. A duplicate identity-card number yields `Conflict`.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Get a user by id, restricted to the given soft-delete scope
    async fn get(&self, id: i32, scope: RecordScope) -> Result<Option<User>, DomainError>;

    /// Get any user (live or removed) holding the identity-card number
    async fn get_by_dni(&self, dni: i32) -> Result<Option<User>, DomainError>;

    /// One window of users matching the filter
    async fn search(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<Vec<User>, DomainError>;

    /// Count all users matching the filter, ignoring pagination
    async fn count(&self, filter: &UserFilter) -> Result<u64, DomainError>;

    /// Count live users, optionally only those created at or after `since`
    async fn count_active(&self, since: Option<DateTime<Utc>>) -> Result<u64, DomainError>;

    /// All soft-deleted users
    async fn list_removed(&self) -> Result<Vec<User>, DomainError>;

    /// Apply a partial update by id; returns the number of affected rows
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<u64, DomainError>;

    /// Physically remove a row; returns the number of affected rows
    async fn delete(&self, id: i32) -> Result<u64, DomainError>;
}
