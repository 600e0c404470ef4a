//! In-memory administrator repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::admin::{Admin, AdminChanges, AdminRepository, AdminSummary, NewAdmin};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Admin>,
    next_id: i32,
}

/// In-memory implementation of AdminRepository
#[derive(Debug, Default)]
pub struct InMemoryAdminRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn stored_password(&self, id: i32) -> Option<String> {
        let table = self.table.read().await;
        table.rows.get(&id).map(|a| a.password.clone())
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DomainError> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|a| a.email == admin.email) {
            return Err(DomainError::conflict("Email already taken"));
        }

        table.next_id += 1;
        let admin = Admin::from_new(table.next_id, admin, Utc::now());
        table.rows.insert(admin.id, admin.clone());

        Ok(admin)
    }

    async fn get(&self, id: i32) -> Result<Option<AdminSummary>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).map(Admin::summary))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<AdminSummary>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|a| a.email == email)
            .map(Admin::summary))
    }

    async fn list(&self) -> Result<Vec<AdminSummary>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().map(Admin::summary).collect())
    }

    async fn update(&self, id: i32, changes: &AdminChanges) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;

        if let Some(email) = &changes.email {
            if table.rows.values().any(|a| &a.email == email && a.id != id) {
                return Err(DomainError::conflict("Email already taken"));
            }
        }

        match table.rows.get_mut(&id) {
            Some(admin) => {
                admin.apply(changes, Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i32) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}
