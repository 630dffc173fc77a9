//! Organization repository for database operations

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Membership, NewOrganization, Organization, OrganizationUpdate};
use crate::repositories::parse_id;

/// Organization repository
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new organization; acronyms are unique
    pub async fn create(&self, organization: &NewOrganization) -> ApiResult<Organization> {
        info!("Creating organization: {}", organization.acronym);

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM organizations WHERE acronym = $1)",
        )
        .bind(&organization.acronym)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            return Err(ApiError::AlreadyExists(
                "An organization with that acronym already exists".to_string(),
            ));
        }

        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, acronym)
            VALUES ($1, $2)
            RETURNING id, name, acronym, created_at, updated_at
            "#,
        )
        .bind(&organization.name)
        .bind(&organization.acronym)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Find an organization by id
    pub async fn find_by_id(&self, id: &str) -> ApiResult<Organization> {
        let id = parse_id(id, "organization")?;

        sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, acronym, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Organization with ID {id} not found")))
    }

    /// Get all organizations
    pub async fn find_all(&self) -> ApiResult<Vec<Organization>> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, acronym, created_at, updated_at
            FROM organizations
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(organizations)
    }

    /// Partially update an organization by id
    pub async fn update_by_id(
        &self,
        id: &str,
        update: &OrganizationUpdate,
    ) -> ApiResult<Organization> {
        let id = parse_id(id, "organization")?;

        sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET name = COALESCE($2, name),
                acronym = COALESCE($3, acronym),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, acronym, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.acronym)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Organization with ID {id} not found")))
    }

    /// Delete an organization by id
    pub async fn delete_by_id(&self, id: &str) -> ApiResult<()> {
        let id = parse_id(id, "organization")?;

        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!(
                "Organization with ID {id} not found"
            )));
        }

        Ok(())
    }

    /// Add a user to an organization with a role; the (user, organization)
    /// pair is unique
    pub async fn add_member(
        &self,
        user_id: &str,
        organization_id: &str,
        role: &str,
    ) -> ApiResult<Membership> {
        let user_id = parse_id(user_id, "user")?;
        let organization_id = parse_id(organization_id, "organization")?;

        if self.membership(user_id, organization_id).await?.is_some() {
            return Err(ApiError::AlreadyExists(
                "The user already belongs to that organization".to_string(),
            ));
        }

        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO user_organizations (user_id, organization_id, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, organization_id, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Change a member's role within an organization
    pub async fn update_member_role(
        &self,
        user_id: &str,
        organization_id: &str,
        role: &str,
    ) -> ApiResult<Membership> {
        let user_id = parse_id(user_id, "user")?;
        let organization_id = parse_id(organization_id, "organization")?;

        sqlx::query_as::<_, Membership>(
            r#"
            UPDATE user_organizations
            SET role = $3, updated_at = now()
            WHERE user_id = $1 AND organization_id = $2
            RETURNING user_id, organization_id, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))
    }

    /// Remove a user from an organization
    pub async fn remove_member(&self, user_id: &str, organization_id: &str) -> ApiResult<()> {
        let user_id = parse_id(user_id, "user")?;
        let organization_id = parse_id(organization_id, "organization")?;

        let result = sqlx::query(
            "DELETE FROM user_organizations WHERE user_id = $1 AND organization_id = $2",
        )
        .bind(user_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Membership not found".to_string()));
        }

        Ok(())
    }

    async fn membership(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> ApiResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT user_id, organization_id, role, created_at, updated_at
            FROM user_organizations
            WHERE user_id = $1 AND organization_id = $2
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }
}
