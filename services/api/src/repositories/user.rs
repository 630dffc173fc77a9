//! User repository for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User, UserUpdate};
use crate::repositories::parse_id;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the given authorities
    pub async fn create(&self, new_user: &NewUser, authorities: &[String]) -> ApiResult<User> {
        info!("Creating new user: {}", new_user.email);

        if self.find_by_email(&new_user.email).await?.is_some() {
            return Err(ApiError::AlreadyExists(
                "User with that email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&new_user.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, authorities)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, authorities, created_at, updated_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(authorities)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_uuid(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, authorities, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by a path-supplied id string
    pub async fn find_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        let id = parse_id(id, "user")?;
        self.find_by_uuid(id).await
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, authorities, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get all users
    pub async fn find_all(&self) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, authorities, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Partially update a user; a new password is re-hashed before storage
    pub async fn update(&self, id: &str, update: &UserUpdate) -> ApiResult<User> {
        let id = parse_id(id, "user")?;

        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                authorities = COALESCE($5, authorities),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, authorities, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(&password_hash)
        .bind(&update.authorities)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {id} not found")))?;

        Ok(user)
    }

    /// Delete a user by id; an administrator cannot delete their own account
    pub async fn delete_by_id(&self, actor: Uuid, id: &str) -> ApiResult<User> {
        let id = parse_id(id, "user")?;

        if actor == id {
            return Err(ApiError::Validation(
                "An administrator cannot delete their own account".to_string(),
            ));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, name, email, password_hash, authorities, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {id} not found")))?;

        Ok(user)
    }

    /// Grant an authority to a user; fails if the user already holds it
    pub async fn add_authority(&self, id: &str, authority: &str) -> ApiResult<User> {
        let id = parse_id(id, "user")?;

        let user = self
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User with id {id} not found")))?;

        if user.authorities.iter().any(|held| held == authority) {
            return Err(ApiError::AlreadyExists(
                "User already has that role".to_string(),
            ));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET authorities = array_append(authorities, $2), updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, authorities, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(authority)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Revoke an authority from a user; revoking an authority the user does
    /// not hold is a no-op
    pub async fn remove_authority(&self, id: &str, authority: &str) -> ApiResult<User> {
        let id = parse_id(id, "user")?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET authorities = array_remove(authorities, $2), updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, authorities, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(authority)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {id} not found")))?;

        Ok(user)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| ApiError::Internal(format!("Failed to parse password hash: {e}")))?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Hash a plaintext password with argon2
fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_differs_from_plaintext() {
        let hash = hash_password("Sup3rSecret").unwrap();
        assert_ne!(hash, "Sup3rSecret");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_hashed_password_verifies() {
        let hash = hash_password("Sup3rSecret").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"Sup3rSecret", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"WrongPassword1", &parsed)
                .is_err()
        );
    }
}
