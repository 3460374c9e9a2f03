//! The authenticated user record used for access decisions.

use serde::{Deserialize, Serialize};

/// Raw identity attributes as issued by the identity provider.
///
/// The flags are not mutually exclusive: a contractor may also carry an
/// admin role. [`crate::user_type::classify`] settles the precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_operator: bool,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default)]
    pub contractor_id: Option<String>,
    #[serde(default)]
    pub contractor_onboarding_completed: bool,
    #[serde(default)]
    pub user_profile_type: Option<String>,
    #[serde(default)]
    pub property_use_type: Option<String>,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// An active principal with no id and every other flag unset.
impl Default for Principal {
    fn default() -> Self {
        Self {
            id: String::new(),
            email: None,
            role: None,
            is_operator: false,
            operator_id: None,
            is_contractor: false,
            contractor_id: None,
            contractor_onboarding_completed: false,
            user_profile_type: None,
            property_use_type: None,
            onboarding_completed: false,
            is_active: default_active(),
        }
    }
}

impl Principal {
    /// A principal with only an id and every flag at its default.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_principal_is_active() {
        assert!(Principal::default().is_active);
        assert!(Principal::new("user_1").is_active);
    }

    #[test]
    fn missing_is_active_deserializes_as_active() {
        let p: Principal = serde_json::from_str(r#"{ "id": "user_1" }"#).unwrap();
        assert!(p.is_active);
        assert_eq!(p, Principal::new("user_1"));
    }
}
