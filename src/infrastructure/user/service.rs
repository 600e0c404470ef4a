//! User directory service: registration, listing and soft-delete lifecycle

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tracing::debug;

use crate::domain::user::{
    NewUser, PageRequest, RecordScope, User, UserChanges, UserFilter, UserPage, UserRepository,
    UserSort, UserStats,
};
use crate::domain::DomainError;

/// User service for the directory
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new user. The identity card number must not be in use,
    /// soft-deleted rows included.
    pub async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        debug!(dni = user.dni, "Creating user");

        if self.repository.get_by_dni(user.dni).await?.is_some() {
            return Err(DomainError::conflict("Identity card number already used"));
        }

        self.repository.create(user).await
    }

    /// List live users whose first or last name contains `search`
    pub async fn list(
        &self,
        search: Option<&str>,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError> {
        let filter = UserFilter::NameContains(search.unwrap_or_default().to_string());
        self.page_of(&filter, sort, page).await
    }

    /// List live users whose identity card number starts with `prefix`
    pub async fn list_by_identity_card(
        &self,
        prefix: Option<&str>,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError> {
        let filter = UserFilter::IdentityCardPrefix(prefix.unwrap_or_default().to_string());
        self.page_of(&filter, sort, page).await
    }

    async fn page_of(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<UserPage, DomainError> {
        debug!(?filter, ?sort, skip = page.skip, limit = page.limit, "Listing users");

        let data = self.repository.search(filter, sort, page).await?;
        if data.is_empty() {
            return Err(DomainError::not_found("Users not found"));
        }

        let count = self.repository.count(filter).await?;

        Ok(UserPage {
            data,
            count,
            total: page.page_count(count),
        })
    }

    /// Get a live user by id
    pub async fn find_one(&self, id: i32) -> Result<User, DomainError> {
        self.repository
            .get(id, RecordScope::Active)
            .await?
            .ok_or_else(|| DomainError::bad_request("User not found"))
    }

    /// Apply a partial update and return the refreshed record
    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError> {
        debug!(id, "Updating user");

        if let Some(dni) = changes.dni {
            let holder = self.repository.get_by_dni(dni).await?;
            if holder.is_some_and(|other| other.id != id) {
                return Err(DomainError::conflict("Identity card already exists"));
            }
        }

        if self.repository.update(id, &changes).await? == 0 {
            return Err(DomainError::bad_request("User not updated"));
        }

        self.find_one(id).await
    }

    /// Physically delete a user, whatever its soft-delete flag, and return
    /// the record as it was before removal
    pub async fn remove(&self, id: i32) -> Result<User, DomainError> {
        debug!(id, "Removing user");

        let snapshot = self
            .repository
            .get(id, RecordScope::Any)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        if self.repository.delete(id).await? == 0 {
            return Err(DomainError::bad_request("User not deleted"));
        }

        Ok(snapshot)
    }

    /// Flag a user as deleted; it then only shows up among removed users
    pub async fn soft_delete(&self, id: i32) -> Result<User, DomainError> {
        debug!(id, "Soft-deleting user");

        if self.repository.update(id, &UserChanges::soft_delete()).await? == 0 {
            return Err(DomainError::bad_request("Error deleting user (soft)"));
        }

        self.repository
            .get(id, RecordScope::Removed)
            .await?
            .ok_or_else(|| DomainError::bad_request("Error deleting user (soft)"))
    }

    /// Share of live users registered since local midnight
    pub async fn new_users_today(&self) -> Result<UserStats, DomainError> {
        let total = self.repository.count_active(None).await?;
        if total == 0 {
            return Err(DomainError::bad_request("Error counting users"));
        }

        let today = self
            .repository
            .count_active(Some(start_of_local_day()?))
            .await?;

        Ok(UserStats::new(total, today))
    }

    /// All soft-deleted users. An empty result is not an error here.
    pub async fn find_removed_users(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list_removed().await
    }
}

fn start_of_local_day() -> Result<DateTime<Utc>, DomainError> {
    Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        .ok_or_else(|| DomainError::internal("Could not resolve local midnight"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{SortDirection, SortKey};
    use crate::infrastructure::user::InMemoryUserRepository;
    use chrono::Duration;

    fn new_user(first: &str, last: &str, dni: i32) -> NewUser {
        NewUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
            dni,
            area_code: 11,
            phone: 1144445555,
            email: Some(format!("{}@example.com", first.to_lowercase())),
            is_deleted: false,
        }
    }

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn test_create_and_find_one() {
        let service = create_service();

        let created = service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();
        let found = service.find_one(created.id).await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.first_name, "Ana");
        assert_eq!(found.dni, 1234567);
        assert!(!found.is_deleted);
    }

    #[tokio::test]
    async fn test_duplicate_dni_leaves_one_row() {
        let service = create_service();
        service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();

        let result = service.create(new_user("Luis", "Rey", 1234567)).await;
        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(message, "Identity card number already used")
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let page = service
            .list(None, UserSort::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.count, 1);
    }

    #[tokio::test]
    async fn test_list_with_empty_search_returns_everyone_alive() {
        let service = create_service();
        for i in 0..3 {
            service
                .create(new_user("Ana", "Paz", 2000000 + i))
                .await
                .unwrap();
        }

        let page = service
            .list(Some(""), UserSort::default(), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.data.len(), 3);
        assert_eq!(page.count, 3);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_list_pages_and_totals() {
        let service = create_service();
        for i in 0..5 {
            service
                .create(new_user("Ana", &format!("Paz{}", i), 2000000 + i))
                .await
                .unwrap();
        }

        let sort = UserSort::new(Some(SortKey::LastName), Some(SortDirection::Asc));
        let page = service
            .list(None, sort, PageRequest::parse(Some("2"), Some("4")))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].last_name, "Paz4");
        assert_eq!(page.count, 5);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_list_empty_page_is_not_found() {
        let service = create_service();
        service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();

        let result = service
            .list(Some("nobody"), UserSort::default(), PageRequest::default())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = service
            .list(None, UserSort::default(), PageRequest::parse(None, Some("10")))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = service
            .list(None, UserSort::default(), PageRequest::parse(None, Some("5000000000")))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_by_identity_card_prefix() {
        let service = create_service();
        service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();
        service.create(new_user("Luis", "Rey", 12399999)).await.unwrap();
        service.create(new_user("Eva", "Sol", 4123456)).await.unwrap();
        let removed = service.create(new_user("Ivo", "Mar", 1230000)).await.unwrap();
        service.soft_delete(removed.id).await.unwrap();

        let page = service
            .list_by_identity_card(Some("123"), UserSort::default(), PageRequest::default())
            .await
            .unwrap();

        let mut dnis: Vec<_> = page.data.iter().map(|u| u.dni).collect();
        dnis.sort();
        assert_eq!(dnis, vec![1234567, 12399999]);
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_find_one_missing_is_bad_request() {
        let service = create_service();
        let result = service.find_one(99).await;
        assert!(matches!(result, Err(DomainError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_update_dni_conflicts_with_other_user_only() {
        let service = create_service();
        let ana = service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();
        service.create(new_user("Luis", "Rey", 7654321)).await.unwrap();

        let taken = UserChanges {
            dni: Some(7654321),
            ..Default::default()
        };
        let result = service.update(ana.id, taken).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        let own = UserChanges {
            dni: Some(1234567),
            first_name: Some("Anabel".to_string()),
            ..Default::default()
        };
        let updated = service.update(ana.id, own).await.unwrap();
        assert_eq!(updated.first_name, "Anabel");
        assert_eq!(updated.dni, 1234567);
        assert!(updated.updated_at >= ana.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_bad_request() {
        let service = create_service();
        let result = service.update(42, UserChanges::default()).await;
        match result {
            Err(DomainError::BadRequest { message }) => assert_eq!(message, "User not updated"),
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_that_flags_deleted_fails_reread() {
        let service = create_service();
        let user = service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();

        let changes = UserChanges {
            is_deleted: Some(true),
            ..Default::default()
        };
        match service.update(user.id, changes).await {
            Err(DomainError::BadRequest { message }) => assert_eq!(message, "User not found"),
            other => panic!("expected bad request, got {:?}", other),
        }

        let removed = service.find_removed_users().await.unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, user.id);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_user() {
        let service = create_service();
        let ana = service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();

        let removed = service.soft_delete(ana.id).await.unwrap();
        assert!(removed.is_deleted);

        assert!(matches!(
            service.find_one(ana.id).await,
            Err(DomainError::BadRequest { .. })
        ));
        assert!(matches!(
            service
                .list(None, UserSort::default(), PageRequest::default())
                .await,
            Err(DomainError::NotFound { .. })
        ));

        let removed_users = service.find_removed_users().await.unwrap();
        assert_eq!(removed_users.len(), 1);
        assert_eq!(removed_users[0].id, ana.id);
    }

    #[tokio::test]
    async fn test_soft_delete_missing_user() {
        let service = create_service();
        let result = service.soft_delete(5).await;
        assert!(matches!(result, Err(DomainError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_remove_returns_snapshot_and_erases() {
        let service = create_service();
        let ana = service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();
        service.soft_delete(ana.id).await.unwrap();

        let snapshot = service.remove(ana.id).await.unwrap();
        assert_eq!(snapshot.id, ana.id);
        assert!(snapshot.is_deleted);

        assert!(service.find_removed_users().await.unwrap().is_empty());
        assert!(matches!(
            service.remove(ana.id).await,
            Err(DomainError::NotFound { .. })
        ));

        // dni is free again
        service.create(new_user("Ana", "Paz", 1234567)).await.unwrap();
    }

    #[tokio::test]
    async fn test_new_users_today() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        let users = (1..=8)
            .map(|id| {
                let created = if id <= 5 { now } else { yesterday };
                User::from_new(id, new_user("Ana", "Paz", 3000000 + id), created)
            })
            .collect();

        let service = UserService::new(Arc::new(InMemoryUserRepository::with_users(users)));
        let stats = service.new_users_today().await.unwrap();

        assert_eq!(stats.total, 8);
        assert_eq!(stats.today, 5);
        assert_eq!(stats.percentage, 62.5);
    }

    #[tokio::test]
    async fn test_new_users_today_without_users() {
        let service = create_service();
        match service.new_users_today().await {
            Err(DomainError::BadRequest { message }) => assert_eq!(message, "Error counting users"),
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_start_of_local_day_is_not_in_future() {
        let midnight = start_of_local_day().unwrap();
        assert!(midnight <= Utc::now());
        assert!(Utc::now() - midnight <= Duration::hours(25));
    }
}
