use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{Organization, Partner, Role, RoleName, User, UserAttrs};
use super::store::{RoleResource, Store, StoreError};

const UNIQUE_VIOLATION: &str = "23505";

const USER_COLUMNS: &str = "id, name, email, organization_id, created_at, updated_at";
const ROLE_COLUMNS: &str = "id, name, resource_type, resource_id, created_at";

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or(err: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    let is_unique_violation = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == UNIQUE_VIOLATION)
        .unwrap_or(false);
    if is_unique_violation {
        StoreError::Conflict(message())
    } else {
        StoreError::Sqlx(err)
    }
}

fn scope(resource: RoleResource) -> (Option<&'static str>, Option<i64>) {
    match resource {
        Some((kind, id)) => (Some(kind.as_str()), Some(id)),
        None => (None, None),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let rows = sqlx::query_as::<_, Organization>(
            "SELECT id, name, created_at FROM organizations ORDER BY lower(name), id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, StoreError> {
        let row = sqlx::query_as::<_, Organization>(
            "SELECT id, name, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_organization(&self, name: &str) -> Result<Organization, StoreError> {
        let row = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_partners(&self) -> Result<Vec<Partner>, StoreError> {
        let rows = sqlx::query_as::<_, Partner>(
            "SELECT id, name, organization_id, created_at FROM partners ORDER BY lower(name), id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_partner(&self, id: i64) -> Result<Option<Partner>, StoreError> {
        let row = sqlx::query_as::<_, Partner>(
            "SELECT id, name, organization_id, created_at FROM partners WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_partner(
        &self,
        name: &str,
        organization_id: Option<i64>,
    ) -> Result<Partner, StoreError> {
        let row = sqlx::query_as::<_, Partner>(
            r#"
            INSERT INTO partners (name, organization_id)
            VALUES ($1, $2)
            RETURNING id, name, organization_id, created_at
            "#,
        )
        .bind(name)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_users(&self, organization_id: Option<i64>) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users WHERE ($1::BIGINT IS NULL OR organization_id = $1) ORDER BY lower(name), id",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_user(&self, attrs: &UserAttrs) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, organization_id) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&attrs.name)
            .bind(&attrs.email)
            .bind(attrs.organization_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or(e, || format!("email {} is already taken", attrs.email)))
    }

    async fn update_user(&self, id: i64, attrs: &UserAttrs) -> Result<User, StoreError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, organization_id = $4, updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&attrs.name)
            .bind(&attrs.email)
            .bind(attrs.organization_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, || format!("email {} is already taken", attrs.email)))?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    async fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM users_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_role_by(
        &self,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<Option<Role>, StoreError> {
        let (resource_type, resource_id) = scope(resource);
        let sql = format!(
            r#"
            SELECT {} FROM roles
            WHERE name = $1
            AND resource_type IS NOT DISTINCT FROM $2
            AND resource_id IS NOT DISTINCT FROM $3
            "#,
            ROLE_COLUMNS
        );
        let row = sqlx::query_as::<_, Role>(&sql)
            .bind(name.as_str())
            .bind(resource_type)
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_or_create_role(
        &self,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<Role, StoreError> {
        let (resource_type, resource_id) = scope(resource);
        sqlx::query(
            "INSERT INTO roles (name, resource_type, resource_id) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(name.as_str())
        .bind(resource_type)
        .bind(resource_id)
        .execute(&self.pool)
        .await?;

        self.find_role_by(name, resource)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("role {}", name)))
    }

    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<Role>, StoreError> {
        let rows = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.resource_type, r.resource_id, r.created_at
            FROM roles r
            JOIN users_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn link_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unlink_role(&self, user_id: i64, role_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
