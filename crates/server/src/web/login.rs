//! Dashboard login and logout.

use askama::Template;
use axum::Extension;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

use crate::AppResources;
use crate::auth::{self, CurrentOperator, LOGIN_PATH};
use crate::error::PageError;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    company_name: String,
    error: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// `GET /dashboard/login` - already-authenticated operators skip straight to
/// the dashboard.
#[tracing::instrument(skip(resources, jar))]
pub async fn login_page(
    Extension(resources): Extension<AppResources>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    if let Some(cookie) = jar.get(&resources.config.session.cookie_name)
        && auth::session_operator(resources.db.as_ref(), cookie.value())
            .await?
            .is_some()
    {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let settings = resources.settings.read().await;
    let template = LoginTemplate {
        company_name: settings.company_name.clone(),
        error: None,
    };
    Ok(Html(template.render()?).into_response())
}

/// `POST /dashboard/login` - on success set the session cookie and redirect;
/// on failure re-render the form with an inline error (HTTP 200).
#[tracing::instrument(skip(resources, jar, form))]
pub async fn login_submit(
    Extension(resources): Extension<AppResources>,
    jar: CookieJar,
    axum::Form(form): axum::Form<LoginForm>,
) -> Result<Response, PageError> {
    let db = resources.db.as_ref();

    match auth::authenticate(db, form.username.trim(), &form.password).await? {
        Some(op) => {
            let session =
                auth::create_session(db, &op.id, resources.config.session.lifetime_hours).await?;
            let jar = jar.add(session_cookie(
                &resources.config.session.cookie_name,
                session.token,
            ));
            tracing::info!(username = %op.username, "operator signed in");
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        None => {
            let settings = resources.settings.read().await;
            let template = LoginTemplate {
                company_name: settings.company_name.clone(),
                error: Some("Invalid username or password."),
            };
            Ok(Html(template.render()?).into_response())
        }
    }
}

/// `POST /dashboard/logout` - destroy the session and return to the login page.
#[tracing::instrument(skip(resources, jar))]
pub async fn logout(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(op): CurrentOperator,
    jar: CookieJar,
) -> Result<Response, PageError> {
    let cookie_name = resources.config.session.cookie_name.clone();
    if let Some(cookie) = jar.get(&cookie_name) {
        auth::destroy_session(resources.db.as_ref(), cookie.value()).await?;
    }
    tracing::info!(username = %op.username, "operator signed out");
    let jar = jar.remove(Cookie::from(cookie_name));
    Ok((jar, Redirect::to(LOGIN_PATH)).into_response())
}
