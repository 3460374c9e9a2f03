use std::sync::Arc;

use serde_json::json;
use threesixty_core::access::{evaluate, AccessDecision, AccessReason, AccessRequirement};
use threesixty_core::audit::{event_types, redact_sensitive_fields};
use threesixty_core::principal::Principal;
use threesixty_core::redirect::{resolve_post_login_redirect, same_origin_target};
use threesixty_core::user_type::{classify, UserType};
use threesixty_db::models::audit::CreateAuditLog;
use threesixty_db::AuditSink;
use url::Url;

/// Access decisions for protected views.
pub struct AccessGate {
    audit: Arc<dyn AuditSink>,
    app_origin: Url,
}

impl AccessGate {
    pub fn new(audit: Arc<dyn AuditSink>, app_origin: Url) -> Self {
        Self { audit, app_origin }
    }

    /// Decide whether `principal` may view `path`.
    ///
    /// Every decision other than allow is written to the audit sink.
    /// `context` is free-form client metadata stored with the entry.
    pub async fn authorize(
        &self,
        principal: Option<&Principal>,
        path: &str,
        requirement: &AccessRequirement,
        context: serde_json::Value,
    ) -> AccessDecision {
        let decision = evaluate(principal, path, requirement);

        if !decision.is_allow() {
            let user_type = principal.map(classify);
            tracing::info!(
                user_id = principal.map(|p| p.id.as_str()),
                path,
                outcome = decision.outcome(),
                reason = decision.reason().map(AccessReason::as_str),
                user_type = user_type.map(UserType::as_str),
                "Access not granted"
            );
            let entry = audit_entry(principal, path, requirement, &decision, user_type, context);
            self.record(&entry).await;
        }

        decision
    }

    /// Classification for `principal`.
    pub fn classify(&self, principal: &Principal) -> UserType {
        classify(principal)
    }

    /// Where to send `principal` after login, honouring `redirect_url` only
    /// when it stays on the application origin.
    pub fn post_login_redirect(&self, redirect_url: Option<&str>, principal: &Principal) -> String {
        let target = resolve_post_login_redirect(redirect_url, &self.app_origin, principal);
        if let Some(requested) = redirect_url {
            if !requested.trim().is_empty()
                && same_origin_target(requested, &self.app_origin).is_none()
            {
                tracing::warn!(
                    user_id = %principal.id,
                    requested,
                    target = %target,
                    "Ignored off-origin redirect_url"
                );
            }
        }
        target
    }

    /// Write an audit entry; failures are logged and dropped.
    async fn record(&self, entry: &CreateAuditLog) {
        if let Err(e) = self.audit.record(entry).await {
            tracing::warn!(
                error = %e,
                event_type = %entry.event_type,
                "Failed to write audit log entry"
            );
        }
    }
}

fn audit_entry(
    principal: Option<&Principal>,
    path: &str,
    requirement: &AccessRequirement,
    decision: &AccessDecision,
    user_type: Option<UserType>,
    context: serde_json::Value,
) -> CreateAuditLog {
    let event_type = match decision.reason() {
        Some(AccessReason::UnauthorizedAccess) => event_types::UNAUTHORIZED_ACCESS,
        _ if matches!(decision, AccessDecision::Deny { .. }) => event_types::ACCESS_DENIED,
        _ => event_types::ACCESS_REDIRECT,
    };

    let required: Vec<&str> = requirement.allowed_types.iter().map(|t| t.as_str()).collect();
    let metadata = json!({
        "path": path,
        "reason": decision.reason().map(AccessReason::as_str),
        "target": decision.target(),
        "user_type": user_type.map(UserType::as_str),
        "required_types": required,
        "require_onboarding": requirement.require_onboarding,
        "context": context,
    });

    CreateAuditLog {
        event_type: event_type.to_string(),
        user_id: principal.map(|p| p.id.clone()),
        email: principal.and_then(|p| p.email.clone()),
        status: decision.outcome().to_string(),
        metadata: redact_sensitive_fields(&metadata),
    }
}
