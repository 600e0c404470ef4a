//! Application state for shared services

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::admin::{Admin, AdminRepository, AdminSummary};
use crate::domain::user::{
    NewUser, PageRequest, User, UserChanges, UserPage, UserRepository, UserSort, UserStats,
};
use crate::domain::DomainError;
use crate::infrastructure::admin::{
    AdminService, CreateAdminRequest, PasswordHasher, UpdateAdminRequest,
};
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub admin_service: Arc<dyn AdminServiceTrait>,
    /// Database pool, absent when running on in-memory repositories
    pub pool: Option<PgPool>,
}

/// Trait for user directory operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;
    async fn list(
        &self,
        search: Option<&str>,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError>;
    async fn list_by_identity_card(
        &self,
        prefix: Option<&str>,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError>;
    async fn find_one(&self, id: i32) -> Result<User, DomainError>;
    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError>;
    async fn remove(&self, id: i32) -> Result<User, DomainError>;
    async fn soft_delete(&self, id: i32) -> Result<User, DomainError>;
    async fn new_users_today(&self) -> Result<UserStats, DomainError>;
    async fn find_removed_users(&self) -> Result<Vec<User>, DomainError>;
}

/// Trait for administrator operations
#[async_trait::async_trait]
pub trait AdminServiceTrait: Send + Sync {
    async fn create(&self, request: CreateAdminRequest) -> Result<Admin, DomainError>;
    async fn find_all(&self) -> Result<Vec<AdminSummary>, DomainError>;
    async fn find_one(&self, id: i32) -> Result<AdminSummary, DomainError>;
    async fn update(
        &self,
        id: i32,
        request: UpdateAdminRequest,
    ) -> Result<AdminSummary, DomainError>;
    async fn remove(&self, id: i32) -> Result<AdminSummary, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        UserService::create(self, user).await
    }

    async fn list(
        &self,
        search: Option<&str>,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError> {
        UserService::list(self, search, sort, page).await
    }

    async fn list_by_identity_card(
        &self,
        prefix: Option<&str>,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError> {
        UserService::list_by_identity_card(self, prefix, sort, page).await
    }

    async fn find_one(&self, id: i32) -> Result<User, DomainError> {
        UserService::find_one(self, id).await
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError> {
        UserService::update(self, id, changes).await
    }

    async fn remove(&self, id: i32) -> Result<User, DomainError> {
        UserService::remove(self, id).await
    }

    async fn soft_delete(&self, id: i32) -> Result<User, DomainError> {
        UserService::soft_delete(self, id).await
    }

    async fn new_users_today(&self) -> Result<UserStats, DomainError> {
        UserService::new_users_today(self).await
    }

    async fn find_removed_users(&self) -> Result<Vec<User>, DomainError> {
        UserService::find_removed_users(self).await
    }
}

#[async_trait::async_trait]
impl<R, H> AdminServiceTrait for AdminService<R, H>
where
    R: AdminRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: CreateAdminRequest) -> Result<Admin, DomainError> {
        AdminService::create(self, request).await
    }

    async fn find_all(&self) -> Result<Vec<AdminSummary>, DomainError> {
        AdminService::find_all(self).await
    }

    async fn find_one(&self, id: i32) -> Result<AdminSummary, DomainError> {
        AdminService::find_one(self, id).await
    }

    async fn update(
        &self,
        id: i32,
        request: UpdateAdminRequest,
    ) -> Result<AdminSummary, DomainError> {
        AdminService::update(self, id, request).await
    }

    async fn remove(&self, id: i32) -> Result<AdminSummary, DomainError> {
        AdminService::remove(self, id).await
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        admin_service: Arc<dyn AdminServiceTrait>,
    ) -> Self {
        Self {
            user_service,
            admin_service,
            pool: None,
        }
    }

    /// Attach the database pool used by the readiness probe
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }
}
