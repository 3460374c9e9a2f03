use std::sync::Arc;

use threesixty_db::{AuditSink, NotificationStore};

use crate::access::AccessGate;
use crate::auth::IdentityProvider;
use crate::config::ServerConfig;
use crate::notifications::PreferenceResolver;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Preference and settings storage (health checks go through it too).
    pub store: Arc<dyn NotificationStore>,
    /// Resolves bearer tokens to principals.
    pub identity: Arc<dyn IdentityProvider>,
    /// Notification preference resolution.
    pub preferences: Arc<PreferenceResolver>,
    /// Route access decisions.
    pub access: Arc<AccessGate>,
}

impl AppState {
    /// Wire the services onto the given collaborators.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn NotificationStore>,
        audit: Arc<dyn AuditSink>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let preferences = Arc::new(PreferenceResolver::new(Arc::clone(&store)));
        let access = Arc::new(AccessGate::new(audit, config.app_origin.clone()));
        Self {
            config: Arc::new(config),
            store,
            identity,
            preferences,
            access,
        }
    }
}
