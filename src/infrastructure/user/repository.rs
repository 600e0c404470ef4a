//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{
    NewUser, PageRequest, RecordScope, SortDirection, SortKey, User, UserChanges, UserFilter,
    UserRepository, UserSort,
};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, User>,
    next_id: i32,
}

impl Table {
    fn dni_taken(&self, dni: i32, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|u| u.dni == dni && Some(u.id) != except)
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with pre-existing rows, keeping their ids and
    /// timestamps
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        let rows = users.into_iter().map(|u| (u.id, u)).collect();

        Self {
            table: Arc::new(RwLock::new(Table { rows, next_id })),
        }
    }
}

fn compare(a: &User, b: &User, key: SortKey) -> std::cmp::Ordering {
    match key {
        SortKey::FirstName => a.first_name.cmp(&b.first_name),
        SortKey::LastName => a.last_name.cmp(&b.last_name),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.dni_taken(user.dni, None) {
            return Err(DomainError::conflict("Identity card number already used"));
        }

        table.next_id += 1;
        let user = User::from_new(table.next_id, user, Utc::now());
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get(&self, id: i32, scope: RecordScope) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).filter(|u| scope.admits(u)).cloned())
    }

    async fn get_by_dni(&self, dni: i32) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.dni == dni).cloned())
    }

    async fn search(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;

        let mut matching: Vec<&User> = table.rows.values().filter(|u| filter.matches(u)).collect();

        if let Some((key, direction)) = sort.order() {
            matching.sort_by(|a, b| match direction {
                SortDirection::Asc => compare(a, b, key),
                SortDirection::Desc => compare(b, a, key),
            });
        }

        Ok(matching
            .into_iter()
            .skip(usize::try_from(page.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn count_active(&self, since: Option<DateTime<Utc>>) -> Result<u64, DomainError> {
        let table = self.table.read().await;

        let count = table
            .rows
            .values()
            .filter(|u| !u.is_deleted)
            .filter(|u| since.is_none_or(|since| u.created_at >= since))
            .count();

        Ok(count as u64)
    }

    async fn list_removed(&self) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|u| u.is_deleted).cloned().collect())
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Ok(0);
        }

        if let Some(dni) = changes.dni {
            if table.dni_taken(dni, Some(id)) {
                return Err(DomainError::conflict("Identity card already exists"));
            }
        }

        if let Some(user) = table.rows.get_mut(&id) {
            user.apply(changes, Utc::now());
        }

        Ok(1)
    }

    async fn delete(&self, id: i32) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}
