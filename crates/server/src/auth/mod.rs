//! Session/auth gate for the operator dashboard.
//!
//! Credentials are checked against the `operator` table; a successful login
//! stores an opaque random token in `operator_session` and hands it to the
//! browser as an HttpOnly cookie. The [`CurrentOperator`] extractor guards
//! every dashboard handler and redirects anonymous requests to the login page.

pub mod password;

pub use password::{hash_password, verify_password};

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter,
};
use time::{Duration, OffsetDateTime};

use crate::AppResources;
use crate::entity::{operator, operator_session};

/// Path of the login page unauthenticated dashboard requests are sent to.
pub const LOGIN_PATH: &str = "/dashboard/login";

/// Generate a secure random session token.
///
/// Returns a URL-safe base64-encoded string.
pub fn generate_session_token() -> String {
    use base64::Engine;
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).expect("Failed to generate random bytes");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Check a username/password pair.
///
/// On success updates `last_login_at` and returns the operator; bad username
/// and bad password are indistinguishable to the caller.
#[tracing::instrument(skip(db, password))]
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<Option<operator::Model>, sea_orm::DbErr> {
    let Some(op) = operator::Entity::find()
        .filter(operator::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if !verify_password(password, &op.password_hash) {
        tracing::debug!(username, "password verification failed");
        return Ok(None);
    }

    let mut active: operator::ActiveModel = op.into();
    active.last_login_at = Set(Some(OffsetDateTime::now_utc()));
    let op = active.update(db).await?;
    Ok(Some(op))
}

/// Create a session row for the operator and return it.
pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    operator_id: &str,
    lifetime_hours: i64,
) -> Result<operator_session::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let session = operator_session::ActiveModel {
        token: Set(generate_session_token()),
        operator_id: Set(operator_id.to_string()),
        created_at: Set(now),
        expires_at: Set(now + Duration::hours(lifetime_hours)),
    };
    session.insert(db).await
}

/// Delete the session row for the given token, if any.
pub async fn destroy_session<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<(), sea_orm::DbErr> {
    operator_session::Entity::delete_by_id(token).exec(db).await?;
    Ok(())
}

/// Look up a live (non-expired) session and its operator.
pub async fn session_operator<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<operator::Model>, sea_orm::DbErr> {
    let Some((session, op)) = operator_session::Entity::find_by_id(token)
        .find_also_related(operator::Entity)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if session.expires_at <= OffsetDateTime::now_utc() {
        // Expired sessions are dropped lazily on their next use.
        session.delete(db).await?;
        return Ok(None);
    }

    Ok(op)
}

/// Rejection that sends the browser to the login page.
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// Extractor gating dashboard handlers behind a valid session cookie.
///
/// ```ignore
/// async fn handler(CurrentOperator(op): CurrentOperator) -> impl IntoResponse {
///     format!("Hello, {}", op.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentOperator(pub operator::Model);

impl<S> FromRequestParts<S> for CurrentOperator
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(resources) = parts
            .extract::<Extension<AppResources>>()
            .await
            .map_err(|_| AuthRedirect)?;

        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRedirect)?;

        let token = jar
            .get(&resources.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .ok_or(AuthRedirect)?;

        match session_operator(resources.db.as_ref(), &token).await {
            Ok(Some(op)) => Ok(CurrentOperator(op)),
            Ok(None) => Err(AuthRedirect),
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                Err(AuthRedirect)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tokens_are_unique_and_url_safe() {
        let token1 = generate_session_token();
        let token2 = generate_session_token();

        assert_ne!(token1, token2);
        assert!(!token1.contains('+'));
        assert!(!token1.contains('/'));
        assert!(!token1.contains('='));
        // 32 bytes base64 encoded
        assert!(token1.len() >= 40);
    }
}
