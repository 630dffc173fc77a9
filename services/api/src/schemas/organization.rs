//! Organization and membership payload validation

use serde_json::Value;

use crate::error::FieldError;
use crate::models::{NewOrganization, OrganizationUpdate};
use crate::schemas::{FromData, optional_string, require_string_with};

impl FromData for NewOrganization {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];

        let name = require_string_with(value, "name", "Name is required", &mut errors);
        let acronym = require_string_with(value, "acronym", "Acronym is required", &mut errors);

        match (name, acronym) {
            (Some(name), Some(acronym)) if errors.is_empty() => {
                Ok(NewOrganization { name, acronym })
            }
            _ => Err(errors),
        }
    }
}

impl FromData for OrganizationUpdate {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];

        let name = optional_string(value, "name", &mut errors);
        let acronym = optional_string(value, "acronym", &mut errors);

        if errors.is_empty() {
            Ok(OrganizationUpdate { name, acronym })
        } else {
            Err(errors)
        }
    }
}

/// Role payload for assigning a user to an organization
#[derive(Debug, Clone)]
pub struct MembershipRole {
    pub role: String,
}

impl FromData for MembershipRole {
    fn from_data(value: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = vec![];
        let role = require_string_with(value, "role", "Role is required", &mut errors);

        match role {
            Some(role) if errors.is_empty() => Ok(MembershipRole { role }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_organization_requires_name_and_acronym() {
        let errors = NewOrganization::from_data(&json!({})).unwrap_err();
        assert_eq!(errors[0], FieldError::new("name", "Name is required"));
        assert_eq!(errors[1], FieldError::new("acronym", "Acronym is required"));

        let org = NewOrganization::from_data(&json!({
            "name": "Youth Platform",
            "acronym": "YP"
        }))
        .unwrap();
        assert_eq!(org.acronym, "YP");
    }

    #[test]
    fn test_membership_role_required() {
        let errors = MembershipRole::from_data(&json!({})).unwrap_err();
        assert_eq!(errors[0], FieldError::new("role", "Role is required"));
    }
}
