//! Session extraction from forwarded identity headers.
//!
//! The mobile client authenticates against the upstream identity
//! provider; requests reach the gateway with `x-user-id` and
//! `x-user-role` headers already resolved. This extractor turns them
//! into the explicit [`Session`] value every handler threads into the
//! coordinator.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::{Role, Session};
use crate::error::GatewayError;

/// Header carrying the authenticated user's identifier.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER)?;
        let role_raw = header_value(parts, USER_ROLE_HEADER)?;
        let role: Role = role_raw
            .parse()
            .map_err(|e: crate::domain::session::UnknownRole| {
                GatewayError::Unauthenticated(e.to_string())
            })?;
        Ok(Session::new(user_id, role))
    }
}

/// Reads a required, non-blank header value.
fn header_value(parts: &Parts, name: &str) -> Result<String, GatewayError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::Unauthenticated(format!("missing {name} header")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<Session, GatewayError> {
        let (mut parts, ()) = request.into_parts();
        Session::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_manager_session() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "mgr-1")
            .header(USER_ROLE_HEADER, "manager")
            .body(())
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let session = extract(request).await.ok();
        assert_eq!(session, Some(Session::new("mgr-1", Role::Manager)));
    }

    #[tokio::test]
    async fn missing_headers_are_unauthenticated() {
        let request = Request::builder().body(()).ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let result = extract(request).await;
        assert!(matches!(result, Err(GatewayError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "someone")
            .header(USER_ROLE_HEADER, "admin")
            .body(())
            .ok();
        let Some(request) = request else {
            panic!("request build failed");
        };

        let result = extract(request).await;
        assert!(matches!(result, Err(GatewayError::Unauthenticated(_))));
    }
}
