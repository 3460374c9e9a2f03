//! Principal classification and per-type landing routes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::principal::Principal;

pub const ROLE_ADMIN: &str = "admin";
pub const PROFILE_TYPE_INVESTOR: &str = "investor";

/// `property_use_type` values that mark a user as an investor.
pub const INVESTOR_PROPERTY_USES: &[&str] = &["rental", "investment", "rental_property"];

pub const ROUTE_ADMIN: &str = "/admin";
pub const ROUTE_OPERATOR: &str = "/operator/dashboard";
pub const ROUTE_CONTRACTOR: &str = "/contractor/dashboard";
pub const ROUTE_INVESTOR: &str = "/investor/dashboard";
pub const ROUTE_HOMEOWNER: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    Operator,
    Contractor,
    Investor,
    Homeowner,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Operator => "operator",
            UserType::Contractor => "contractor",
            UserType::Investor => "investor",
            UserType::Homeowner => "homeowner",
        }
    }

    /// Landing page for this type of user.
    pub fn default_route(self) -> &'static str {
        match self {
            UserType::Admin => ROUTE_ADMIN,
            UserType::Operator => ROUTE_OPERATOR,
            UserType::Contractor => ROUTE_CONTRACTOR,
            UserType::Investor => ROUTE_INVESTOR,
            UserType::Homeowner => ROUTE_HOMEOWNER,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserType::Admin),
            "operator" => Ok(UserType::Operator),
            "contractor" => Ok(UserType::Contractor),
            "investor" => Ok(UserType::Investor),
            "homeowner" => Ok(UserType::Homeowner),
            other => Err(CoreError::Validation(format!("Invalid user type '{other}'"))),
        }
    }
}

/// A predicate and the type it assigns.
pub type ClassificationRule = (fn(&Principal) -> bool, UserType);

/// Classification rules, highest priority first. The first match wins.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    (is_admin, UserType::Admin),
    (is_operator, UserType::Operator),
    (is_contractor, UserType::Contractor),
    (is_investor, UserType::Investor),
];

fn is_admin(p: &Principal) -> bool {
    p.role.as_deref() == Some(ROLE_ADMIN)
}

fn is_operator(p: &Principal) -> bool {
    p.is_operator || has_value(&p.operator_id)
}

fn is_contractor(p: &Principal) -> bool {
    p.is_contractor || has_value(&p.contractor_id)
}

fn is_investor(p: &Principal) -> bool {
    p.user_profile_type.as_deref() == Some(PROFILE_TYPE_INVESTOR)
        || p
            .property_use_type
            .as_deref()
            .is_some_and(|u| INVESTOR_PROPERTY_USES.contains(&u))
}

fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Classify a principal. Total: anything unmatched is a homeowner.
pub fn classify(principal: &Principal) -> UserType {
    CLASSIFICATION_RULES
        .iter()
        .find(|(matches, _)| matches(principal))
        .map(|(_, user_type)| *user_type)
        .unwrap_or(UserType::Homeowner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::new("user_1")
    }

    #[test]
    fn admin_beats_contractor() {
        let p = Principal {
            role: Some("admin".into()),
            is_contractor: true,
            ..principal()
        };
        assert_eq!(classify(&p), UserType::Admin);
    }

    #[test]
    fn operator_beats_contractor_and_investor() {
        let p = Principal {
            operator_id: Some("op_9".into()),
            contractor_id: Some("ct_1".into()),
            user_profile_type: Some("investor".into()),
            ..principal()
        };
        assert_eq!(classify(&p), UserType::Operator);
    }

    #[test]
    fn contractor_by_id_alone() {
        let p = Principal {
            contractor_id: Some("ct_1".into()),
            ..principal()
        };
        assert_eq!(classify(&p), UserType::Contractor);
    }

    #[test]
    fn blank_ids_do_not_count() {
        let p = Principal {
            operator_id: Some("  ".into()),
            ..principal()
        };
        assert_eq!(classify(&p), UserType::Homeowner);
    }

    #[test]
    fn investor_by_profile_or_property_use() {
        let by_profile = Principal {
            user_profile_type: Some("investor".into()),
            ..principal()
        };
        let by_use = Principal {
            property_use_type: Some("rental".into()),
            ..principal()
        };
        assert_eq!(classify(&by_profile), UserType::Investor);
        assert_eq!(classify(&by_use), UserType::Investor);
    }

    #[test]
    fn no_flags_is_homeowner() {
        assert_eq!(classify(&principal()), UserType::Homeowner);

        let non_admin_role = Principal {
            role: Some("user".into()),
            property_use_type: Some("primary_residence".into()),
            ..principal()
        };
        assert_eq!(classify(&non_admin_role), UserType::Homeowner);
    }

    #[test]
    fn rules_are_in_priority_order() {
        let order: Vec<UserType> = CLASSIFICATION_RULES.iter().map(|(_, t)| *t).collect();
        assert_eq!(
            order,
            vec![UserType::Admin, UserType::Operator, UserType::Contractor, UserType::Investor]
        );
    }

    #[test]
    fn default_routes() {
        assert_eq!(UserType::Admin.default_route(), "/admin");
        assert_eq!(UserType::Operator.default_route(), "/operator/dashboard");
        assert_eq!(UserType::Contractor.default_route(), "/contractor/dashboard");
        assert_eq!(UserType::Investor.default_route(), "/investor/dashboard");
        assert_eq!(UserType::Homeowner.default_route(), "/dashboard");
    }
}
