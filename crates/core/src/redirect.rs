//! Post-login redirect resolution.
//!
//! A `redirect_url` supplied by the client is only honoured when it resolves
//! to the application's own origin. Anything else falls back to the user's
//! default route.

use url::Url;

use crate::principal::Principal;
use crate::user_type::classify;

/// Same-origin path (with query and fragment) for `candidate`, if any.
///
/// Relative values are resolved against `app_origin`, so `//host/x` and
/// `/\host/x` end up on another host and are rejected.
pub fn same_origin_target(candidate: &str, app_origin: &Url) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    let resolved = app_origin.join(candidate).ok()?;
    if resolved.origin() != app_origin.origin() {
        return None;
    }

    // A path starting with `//` would be read by the browser as a
    // protocol-relative URL to another host.
    let path = resolved.path();
    if path.starts_with("//") || path.starts_with("/\\") {
        return None;
    }

    let mut target = path.to_string();
    if let Some(query) = resolved.query() {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        target.push('#');
        target.push_str(fragment);
    }
    Some(target)
}

/// Where to send `principal` after login.
pub fn resolve_post_login_redirect(
    redirect_url: Option<&str>,
    app_origin: &Url,
    principal: &Principal,
) -> String {
    redirect_url
        .and_then(|candidate| same_origin_target(candidate, app_origin))
        .unwrap_or_else(|| classify(principal).default_route().to_string())
}
