//! Organization model and the user-organization membership link

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Organization entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn to_public(&self) -> PublicOrganization {
        PublicOrganization {
            id: self.id,
            name: self.name.clone(),
            acronym: self.acronym.clone(),
        }
    }
}

/// New organization creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub acronym: String,
}

/// Organization update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub acronym: Option<String>,
}

/// Public representation of an organization
#[derive(Debug, Clone, Serialize)]
pub struct PublicOrganization {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
}

/// Link between a user and an organization; unique per (user, organization)
/// pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
