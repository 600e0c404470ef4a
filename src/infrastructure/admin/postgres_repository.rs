//! PostgreSQL administrator repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::admin::{Admin, AdminChanges, AdminRepository, AdminSummary, NewAdmin};
use crate::domain::DomainError;
use crate::infrastructure::storage::map_write_error;

const SUMMARY_COLUMNS: &str = "id, first_name, last_name, email, created_at, updated_at";

/// PostgreSQL implementation of AdminRepository
#[derive(Debug, Clone)]
pub struct PostgresAdminRepository {
    pool: PgPool,
}

impl PostgresAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepository {
    async fn create(&self, admin: NewAdmin) -> Result<Admin, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO admins (first_name, last_name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, password, created_at, updated_at
            "#,
        )
        .bind(&admin.first_name)
        .bind(&admin.last_name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Email already taken", "Failed to create admin"))?;

        let summary = row_to_summary(&row)?;
        let password = row
            .try_get("password")
            .map_err(|e| DomainError::storage(format!("Invalid admin row: {}", e)))?;

        Ok(Admin {
            id: summary.id,
            first_name: summary.first_name,
            last_name: summary.last_name,
            email: summary.email,
            password,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        })
    }

    async fn get(&self, id: i32) -> Result<Option<AdminSummary>, DomainError> {
        let sql = format!("SELECT {} FROM admins WHERE id = $1", SUMMARY_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get admin: {}", e)))?;

        row.as_ref().map(row_to_summary).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<AdminSummary>, DomainError> {
        let sql = format!("SELECT {} FROM admins WHERE email = $1", SUMMARY_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get admin by email: {}", e)))?;

        row.as_ref().map(row_to_summary).transpose()
    }

    async fn list(&self) -> Result<Vec<AdminSummary>, DomainError> {
        let sql = format!("SELECT {} FROM admins ORDER BY id", SUMMARY_COLUMNS);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list admins: {}", e)))?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn update(&self, id: i32, changes: &AdminChanges) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE admins
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Email already taken", "Failed to update admin"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete admin: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_summary(row: &PgRow) -> Result<AdminSummary, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid admin row: {}", e));

    Ok(AdminSummary {
        id: row.try_get("id").map_err(read)?,
        first_name: row.try_get("first_name").map_err(read)?,
        last_name: row.try_get("last_name").map_err(read)?,
        email: row.try_get("email").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
        updated_at: row.try_get("updated_at").map_err(read)?,
    })
}
