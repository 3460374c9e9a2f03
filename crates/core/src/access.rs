//! Route access decisions.
//!
//! [`evaluate`] is the pure part of the access gate. Checks run in a fixed
//! order: authentication, account state, onboarding, contractor onboarding,
//! then user type.

use serde::{Deserialize, Serialize};

use crate::audit::statuses;
use crate::principal::Principal;
use crate::user_type::{classify, UserType};

pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_ONBOARDING: &str = "/onboarding";
pub const ROUTE_CONTRACTOR_ONBOARDING: &str = "/contractor/onboarding";

/// Query parameter carrying the originally requested path through login.
pub const REDIRECT_URL_PARAM: &str = "redirect_url";

/// What a protected route requires of its visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessRequirement {
    /// Empty means any authenticated user type is allowed.
    #[serde(default)]
    pub allowed_types: Vec<UserType>,
    #[serde(default)]
    pub require_onboarding: bool,
}

/// Why a request was not simply allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    Unauthenticated,
    AccountInactive,
    OnboardingIncomplete,
    ContractorOnboardingIncomplete,
    UnauthorizedAccess,
}

impl AccessReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessReason::Unauthenticated => "unauthenticated",
            AccessReason::AccountInactive => "account_inactive",
            AccessReason::OnboardingIncomplete => "onboarding_incomplete",
            AccessReason::ContractorOnboardingIncomplete => "contractor_onboarding_incomplete",
            AccessReason::UnauthorizedAccess => "unauthorized_access",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny { reason: AccessReason },
    Redirect { target: String, reason: AccessReason },
}

impl AccessDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            AccessDecision::Allow => statuses::ALLOW,
            AccessDecision::Deny { .. } => statuses::DENY,
            AccessDecision::Redirect { .. } => statuses::REDIRECT,
        }
    }

    pub fn reason(&self) -> Option<AccessReason> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny { reason } | AccessDecision::Redirect { reason, .. } => {
                Some(*reason)
            }
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            AccessDecision::Redirect { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Login URL that returns the user to `path` afterwards.
pub fn login_redirect(path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{ROUTE_LOGIN}?{REDIRECT_URL_PARAM}={encoded}")
}

/// Decide whether `principal` may view `path`.
pub fn evaluate(
    principal: Option<&Principal>,
    path: &str,
    requirement: &AccessRequirement,
) -> AccessDecision {
    let Some(principal) = principal else {
        return AccessDecision::Redirect {
            target: login_redirect(path),
            reason: AccessReason::Unauthenticated,
        };
    };

    if !principal.is_active {
        return AccessDecision::Deny {
            reason: AccessReason::AccountInactive,
        };
    }

    if requirement.require_onboarding && !principal.onboarding_completed {
        return AccessDecision::Redirect {
            target: ROUTE_ONBOARDING.to_string(),
            reason: AccessReason::OnboardingIncomplete,
        };
    }

    let user_type = classify(principal);

    if requirement.require_onboarding
        && user_type == UserType::Contractor
        && !principal.contractor_onboarding_completed
        && path_only(path) != ROUTE_CONTRACTOR_ONBOARDING
    {
        return AccessDecision::Redirect {
            target: ROUTE_CONTRACTOR_ONBOARDING.to_string(),
            reason: AccessReason::ContractorOnboardingIncomplete,
        };
    }

    if !requirement.allowed_types.is_empty() && !requirement.allowed_types.contains(&user_type) {
        return AccessDecision::Redirect {
            target: user_type.default_route().to_string(),
            reason: AccessReason::UnauthorizedAccess,
        };
    }

    AccessDecision::Allow
}

fn path_only(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn homeowner() -> Principal {
        Principal {
            onboarding_completed: true,
            ..Principal::new("user_home")
        }
    }

    fn only(types: &[UserType]) -> AccessRequirement {
        AccessRequirement {
            allowed_types: types.to_vec(),
            require_onboarding: false,
        }
    }

    #[test]
    fn anonymous_is_sent_to_login_with_return_path() {
        let decision = evaluate(None, "/dashboard", &only(&[UserType::Admin]));
        assert_eq!(
            decision,
            AccessDecision::Redirect {
                target: "/login?redirect_url=%2Fdashboard".to_string(),
                reason: AccessReason::Unauthenticated,
            }
        );
    }

    #[test]
    fn onboarding_check_precedes_type_check() {
        let p = Principal {
            role: Some("admin".into()),
            onboarding_completed: false,
            ..Principal::new("user_admin")
        };
        let req = AccessRequirement {
            allowed_types: vec![UserType::Admin],
            require_onboarding: true,
        };
        assert_matches!(
            evaluate(Some(&p), "/dashboard", &req),
            AccessDecision::Redirect { target, reason: AccessReason::OnboardingIncomplete }
                if target == "/onboarding"
        );
    }

    #[test]
    fn onboarding_not_required_lets_incomplete_users_through() {
        let p = Principal::new("user_new");
        assert!(evaluate(Some(&p), "/dashboard", &AccessRequirement::default()).is_allow());
    }

    #[test]
    fn wrong_type_goes_to_own_dashboard() {
        let decision = evaluate(Some(&homeowner()), "/admin/users", &only(&[UserType::Admin]));
        assert_eq!(decision.target(), Some("/dashboard"));
        assert_eq!(decision.reason(), Some(AccessReason::UnauthorizedAccess));
    }

    #[test]
    fn allowed_type_is_allowed() {
        let decision = evaluate(
            Some(&homeowner()),
            "/dashboard",
            &only(&[UserType::Homeowner, UserType::Investor]),
        );
        assert!(decision.is_allow());
    }

    #[test]
    fn inactive_account_is_denied() {
        let p = Principal {
            is_active: false,
            ..homeowner()
        };
        assert_eq!(
            evaluate(Some(&p), "/dashboard", &AccessRequirement::default()),
            AccessDecision::Deny {
                reason: AccessReason::AccountInactive
            }
        );
    }

    #[test]
    fn contractor_finishes_contractor_onboarding_first() {
        let p = Principal {
            is_contractor: true,
            onboarding_completed: true,
            contractor_onboarding_completed: false,
            ..Principal::new("user_ct")
        };
        let req = AccessRequirement {
            allowed_types: vec![UserType::Contractor],
            require_onboarding: true,
        };
        assert_eq!(
            evaluate(Some(&p), "/contractor/dashboard", &req).target(),
            Some("/contractor/onboarding")
        );
        assert!(evaluate(Some(&p), "/contractor/onboarding?step=2", &req).is_allow());
    }

    #[test]
    fn decision_serializes_with_outcome_tag() {
        let json = serde_json::to_value(AccessDecision::Redirect {
            target: "/onboarding".into(),
            reason: AccessReason::OnboardingIncomplete,
        })
        .unwrap();
        assert_eq!(json["outcome"], "redirect");
        assert_eq!(json["target"], "/onboarding");
        assert_eq!(json["reason"], "onboarding_incomplete");

        let allow = serde_json::to_value(AccessDecision::Allow).unwrap();
        assert_eq!(allow, serde_json::json!({ "outcome": "allow" }));
    }
}
