//! Administrator service: account management with hashed credentials

use std::sync::Arc;

use tracing::debug;

use crate::domain::admin::{Admin, AdminChanges, AdminRepository, AdminSummary, NewAdmin};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new administrator; the password is in clear text
#[derive(Debug, Clone)]
pub struct CreateAdminRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Partial update request; a present password is re-hashed
#[derive(Debug, Clone, Default)]
pub struct UpdateAdminRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Administrator service
#[derive(Debug)]
pub struct AdminService<R: AdminRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    email_check_excludes_self: bool,
}

impl<R: AdminRepository, H: PasswordHasher + 'static> AdminService<R, H> {
    /// Create a new admin service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            hasher,
            email_check_excludes_self: false,
        }
    }

    /// When set, updating an administrator's email to the value it already
    /// holds is not a conflict
    pub fn with_email_check_excludes_self(mut self, excludes_self: bool) -> Self {
        self.email_check_excludes_self = excludes_self;
        self
    }

    /// Hash on the blocking pool so request workers are not stalled
    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Create a new administrator
    pub async fn create(&self, request: CreateAdminRequest) -> Result<Admin, DomainError> {
        debug!(email = %request.email, "Creating admin");

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::conflict("Email already taken"));
        }

        let password_hash = self.hash_password(request.password).await?;

        self.repository
            .create(NewAdmin {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password_hash,
            })
            .await
    }

    /// List all administrators
    pub async fn find_all(&self) -> Result<Vec<AdminSummary>, DomainError> {
        self.repository.list().await
    }

    /// Get an administrator by id
    pub async fn find_one(&self, id: i32) -> Result<AdminSummary, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Admin not found"))
    }

    /// Apply a partial update and return the refreshed record
    pub async fn update(
        &self,
        id: i32,
        request: UpdateAdminRequest,
    ) -> Result<AdminSummary, DomainError> {
        debug!(id, "Updating admin");

        self.find_one(id).await?;

        if let Some(email) = &request.email {
            let holder = self.repository.get_by_email(email).await?;
            let conflicts =
                holder.is_some_and(|other| !self.email_check_excludes_self || other.id != id);
            if conflicts {
                return Err(DomainError::conflict("Email already taken"));
            }
        }

        let password_hash = match request.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let changes = AdminChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
        };

        if self.repository.update(id, &changes).await? == 0 {
            return Err(DomainError::bad_request("Failed to update admin"));
        }

        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::bad_request("Failed to update admin"))
    }

    /// Delete an administrator and return the record as it was
    pub async fn remove(&self, id: i32) -> Result<AdminSummary, DomainError> {
        debug!(id, "Removing admin");

        let snapshot = self.find_one(id).await?;

        if self.repository.delete(id).await? == 0 {
            return Err(DomainError::bad_request("Failed to remove admin"));
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::admin::{InMemoryAdminRepository, MockPasswordHasher};

    fn create_request(email: &str) -> CreateAdminRequest {
        CreateAdminRequest {
            first_name: "Marta".to_string(),
            last_name: "Suarez".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
        }
    }

    fn prefix_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(format!("hashed:{}", password)));
        hasher
    }

    fn create_service(
        hasher: MockPasswordHasher,
    ) -> AdminService<InMemoryAdminRepository, MockPasswordHasher> {
        AdminService::new(Arc::new(InMemoryAdminRepository::new()), Arc::new(hasher))
    }

    #[tokio::test]
    async fn test_create_stores_hash() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password.to_string() == "secret123")
            .times(1)
            .returning(|_| Ok("$argon2id$stub".to_string()));
        let service = create_service(hasher);

        let admin = service.create(create_request("marta@example.com")).await.unwrap();
        assert_eq!(admin.password, "$argon2id$stub");

        let json = serde_json::to_value(&admin).unwrap();
        assert!(json.get("password").is_none());

        let found = service.find_one(admin.id).await.unwrap();
        assert_eq!(found.email, "marta@example.com");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_skips_hashing() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok("$argon2id$stub".to_string()));
        let service = create_service(hasher);

        service.create(create_request("marta@example.com")).await.unwrap();
        let result = service.create(create_request("marta@example.com")).await;

        match result {
            Err(DomainError::Conflict { message }) => assert_eq!(message, "Email already taken"),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_hash_failure_creates_nothing() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(DomainError::internal("boom")));
        let service = create_service(hasher);

        let result = service.create(create_request("marta@example.com")).await;
        assert!(matches!(result, Err(DomainError::Internal { .. })));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_one_missing() {
        let service = create_service(prefix_hasher());
        match service.find_one(3).await {
            Err(DomainError::NotFound { message }) => assert_eq!(message, "Admin not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_without_password_does_not_hash() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok("$argon2id$stub".to_string()));
        let service = create_service(hasher);
        let admin = service.create(create_request("marta@example.com")).await.unwrap();

        let updated = service
            .update(
                admin.id,
                UpdateAdminRequest {
                    first_name: Some("Martina".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Martina");
        assert_eq!(updated.email, "marta@example.com");
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(2)
            .returning(|password| Ok(format!("hashed:{}", password)));
        let repository = Arc::new(InMemoryAdminRepository::new());
        let service = AdminService::new(repository.clone(), Arc::new(hasher));
        let admin = service.create(create_request("marta@example.com")).await.unwrap();

        service
            .update(
                admin.id,
                UpdateAdminRequest {
                    password: Some("brand-new-pass".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            repository.stored_password(admin.id).await.as_deref(),
            Some("hashed:brand-new-pass")
        );
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other() {
        let service = create_service(prefix_hasher());
        service.create(create_request("marta@example.com")).await.unwrap();
        let other = service.create(create_request("juan@example.com")).await.unwrap();

        let result = service
            .update(
                other.id,
                UpdateAdminRequest {
                    email: Some("marta@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_to_own_email_conflicts_by_default() {
        let service = create_service(prefix_hasher());
        let admin = service.create(create_request("marta@example.com")).await.unwrap();

        let request = UpdateAdminRequest {
            email: Some("marta@example.com".to_string()),
            ..Default::default()
        };

        let result = service.update(admin.id, request).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_to_own_email_allowed_when_excluding_self() {
        let service = create_service(prefix_hasher()).with_email_check_excludes_self(true);
        let admin = service.create(create_request("marta@example.com")).await.unwrap();

        let request = UpdateAdminRequest {
            email: Some("marta@example.com".to_string()),
            ..Default::default()
        };

        let updated = service.update(admin.id, request).await.unwrap();
        assert_eq!(updated.email, "marta@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_admin() {
        let service = create_service(MockPasswordHasher::new());
        let result = service.update(9, UpdateAdminRequest::default()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove() {
        let service = create_service(prefix_hasher());
        let admin = service.create(create_request("marta@example.com")).await.unwrap();

        let removed = service.remove(admin.id).await.unwrap();
        assert_eq!(removed.id, admin.id);

        assert!(service.find_all().await.unwrap().is_empty());
        assert!(matches!(
            service.remove(admin.id).await,
            Err(DomainError::NotFound { .. })
        ));

        // email can be reused once the holder is gone
        service.create(create_request("marta@example.com")).await.unwrap();
    }
}
