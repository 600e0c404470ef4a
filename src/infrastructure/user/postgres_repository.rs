//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::user::{
    NewUser, PageRequest, RecordScope, User, UserChanges, UserFilter, UserRepository, UserSort,
};
use crate::domain::DomainError;
use crate::infrastructure::storage::map_write_error;

const USER_COLUMNS: &str =
    "id, first_name, last_name, dni, area_code, phone, email, is_deleted, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the WHERE clause shared by the page query and the count query
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    builder.push(" WHERE is_deleted = FALSE AND ");

    match filter {
        UserFilter::NameContains(_) => {
            let pattern = filter.like_pattern();
            builder
                .push("(first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        UserFilter::IdentityCardPrefix(_) => {
            builder
                .push("CAST(dni AS TEXT) LIKE ")
                .push_bind(filter.like_pattern());
        }
    }
}

fn scope_clause(scope: RecordScope) -> &'static str {
    match scope {
        RecordScope::Active => " AND is_deleted = FALSE",
        RecordScope::Removed => " AND is_deleted = TRUE",
        RecordScope::Any => "",
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO users (first_name, last_name, dni, area_code, phone, email, is_deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.dni)
            .bind(user.area_code)
            .bind(user.phone)
            .bind(&user.email)
            .bind(user.is_deleted)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(e, "Identity card number already used", "Failed to create user")
            })?;

        row_to_user(&row)
    }

    async fn get(&self, id: i32, scope: RecordScope) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1{}",
            USER_COLUMNS,
            scope_clause(scope)
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_dni(&self, dni: i32) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE dni = $1", USER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(dni)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by dni: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn search(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<Vec<User>, DomainError> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
        push_filter(&mut builder, filter);

        if let Some((key, direction)) = sort.order() {
            builder
                .push(" ORDER BY ")
                .push(key.column())
                .push(" ")
                .push(direction.as_sql());
        }

        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.skip).unwrap_or(i64::MAX));

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, DomainError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn count_active(&self, since: Option<DateTime<Utc>>) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE is_deleted = FALSE
              AND ($1::timestamptz IS NULL OR created_at >= $1)
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn list_removed(&self) -> Result<Vec<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE is_deleted = TRUE ORDER BY id",
            USER_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list removed users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                dni = COALESCE($4, dni),
                area_code = COALESCE($5, area_code),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                is_deleted = COALESCE($8, is_deleted),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(changes.dni)
        .bind(changes.area_code)
        .bind(changes.phone)
        .bind(&changes.email)
        .bind(changes.is_deleted)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Identity card already exists", "Failed to update user"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    Ok(User {
        id: row.try_get("id").map_err(read)?,
        first_name: row.try_get("first_name").map_err(read)?,
        last_name: row.try_get("last_name").map_err(read)?,
        dni: row.try_get("dni").map_err(read)?,
        area_code: row.try_get("area_code").map_err(read)?,
        phone: row.try_get("phone").map_err(read)?,
        email: row.try_get("email").map_err(read)?,
        is_deleted: row.try_get("is_deleted").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
        updated_at: row.try_get("updated_at").map_err(read)?,
    })
}
