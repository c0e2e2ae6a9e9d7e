//! Authenticated operator dashboard: incident lifecycle and manual status edits.

use askama::Template;
use axum::Extension;
use axum::extract::{Path, Query};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;

use crate::AppResources;
use crate::auth::CurrentOperator;
use crate::entity::{incident, service};
use crate::error::PageError;
use crate::lifecycle::{self, NewIncident};
use crate::settings;
use crate::status::{Impact, IncidentStatus, ServiceStatus};
use crate::web::views::{self, IncidentView, SelectOption};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

struct ServiceRow {
    id: i32,
    name: String,
    status_label: String,
    status_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    company_name: String,
    operator: String,
    notice: Option<&'static str>,
    error: Option<&'static str>,
    services: Vec<ServiceRow>,
    active_incidents: Vec<IncidentView>,
    recent_incidents: Vec<IncidentView>,
}

#[derive(Template)]
#[template(path = "incident_form.html")]
struct IncidentFormTemplate {
    company_name: String,
    errors: Vec<&'static str>,
    title_value: String,
    status_options: Vec<SelectOption>,
    impact_options: Vec<SelectOption>,
    services: Vec<ServiceCheckbox>,
}

struct ServiceCheckbox {
    id: i32,
    name: String,
    checked: bool,
}

#[derive(Template)]
#[template(path = "incident_detail.html")]
struct IncidentDetailTemplate {
    company_name: String,
    notice: Option<&'static str>,
    errors: Vec<&'static str>,
    incident: IncidentView,
    status_options: Vec<SelectOption>,
    message_value: String,
}

#[derive(Template)]
#[template(path = "settings.html")]
struct SettingsTemplate {
    company_name: String,
    notice: Option<&'static str>,
    errors: Vec<&'static str>,
    company_name_value: String,
    company_url_value: String,
    logo_url_value: String,
}

async fn company_name(resources: &AppResources) -> String {
    resources.settings.read().await.company_name.clone()
}

async fn ordered_services(
    db: &sea_orm::DatabaseConnection,
) -> Result<Vec<service::Model>, sea_orm::DbErr> {
    service::Entity::find()
        .order_by_asc(service::Column::SortOrder)
        .order_by_asc(service::Column::Name)
        .all(db)
        .await
}

/// `GET /dashboard` - all services, active incidents, last 5 resolved.
#[tracing::instrument(skip(resources))]
pub async fn index(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(op): CurrentOperator,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, PageError> {
    let db = resources.db.as_ref();

    let services = ordered_services(db).await?;
    let rows = services
        .into_iter()
        .map(|svc| {
            let current = svc.status.parse::<ServiceStatus>().ok();
            ServiceRow {
                id: svc.id,
                name: svc.name,
                status_label: current
                    .map(|s| s.label().to_string())
                    .unwrap_or_else(|| svc.status.clone()),
                status_options: views::service_status_options(current),
            }
        })
        .collect();

    let active = incident::Entity::find()
        .filter(incident::Column::Status.ne(IncidentStatus::Resolved.as_str()))
        .order_by_desc(incident::Column::CreatedAt)
        .all(db)
        .await?;

    let recent = incident::Entity::find()
        .filter(incident::Column::Status.eq(IncidentStatus::Resolved.as_str()))
        .order_by_desc(incident::Column::ResolvedAt)
        .limit(5)
        .all(db)
        .await?;

    let template = DashboardTemplate {
        company_name: company_name(&resources).await,
        operator: op.username,
        notice: query.notice.as_deref().and_then(views::notice_message),
        error: query.error.as_deref().and_then(error_message),
        services: rows,
        active_incidents: views::incident_views(db, &active).await?,
        recent_incidents: views::incident_views(db, &recent).await?,
    };

    Ok(Html(template.render()?))
}

fn error_message(key: &str) -> Option<&'static str> {
    match key {
        "invalid_status" => Some("Unknown status value; nothing was changed."),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct IncidentForm {
    pub title: String,
    pub status: String,
    pub impact: String,
    #[serde(default)]
    pub services: Vec<i32>,
}

async fn service_checkboxes(
    db: &sea_orm::DatabaseConnection,
    checked: &[i32],
) -> Result<Vec<ServiceCheckbox>, sea_orm::DbErr> {
    Ok(ordered_services(db)
        .await?
        .into_iter()
        .map(|svc| ServiceCheckbox {
            checked: checked.contains(&svc.id),
            id: svc.id,
            name: svc.name,
        })
        .collect())
}

/// `GET /dashboard/incident/new`
#[tracing::instrument(skip(resources))]
pub async fn incident_new_page(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
) -> Result<Html<String>, PageError> {
    let template = IncidentFormTemplate {
        company_name: company_name(&resources).await,
        errors: Vec::new(),
        title_value: String::new(),
        status_options: views::incident_status_options(Some(IncidentStatus::Investigating)),
        impact_options: views::impact_options(Some(Impact::Minor)),
        services: service_checkboxes(resources.db.as_ref(), &[]).await?,
    };
    Ok(Html(template.render()?))
}

/// `POST /dashboard/incident/new` - validate, run the creation side effects,
/// redirect to the dashboard with a notice. Invalid input re-renders the form
/// with field errors and HTTP 200.
#[tracing::instrument(skip(resources, form))]
pub async fn incident_create(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
    Form(form): Form<IncidentForm>,
) -> Result<Response, PageError> {
    let db = resources.db.as_ref();

    let mut errors = Vec::new();
    let title = form.title.trim().to_string();
    if title.is_empty() {
        errors.push("Title must not be empty.");
    }
    let status = form.status.parse::<IncidentStatus>();
    if status.is_err() {
        errors.push("Unknown incident status.");
    }
    let impact = form.impact.parse::<Impact>();
    if impact.is_err() {
        errors.push("Unknown impact level.");
    }

    let (Ok(status), Ok(impact)) = (status, impact) else {
        let template = IncidentFormTemplate {
            company_name: company_name(&resources).await,
            errors,
            title_value: title,
            status_options: views::incident_status_options(form.status.parse().ok()),
            impact_options: views::impact_options(form.impact.parse().ok()),
            services: service_checkboxes(db, &form.services).await?,
        };
        return Ok(Html(template.render()?).into_response());
    };

    if !errors.is_empty() {
        let template = IncidentFormTemplate {
            company_name: company_name(&resources).await,
            errors,
            title_value: title,
            status_options: views::incident_status_options(Some(status)),
            impact_options: views::impact_options(Some(impact)),
            services: service_checkboxes(db, &form.services).await?,
        };
        return Ok(Html(template.render()?).into_response());
    }

    lifecycle::create_incident(
        db,
        NewIncident {
            title,
            status,
            impact,
            service_ids: form.services,
        },
    )
    .await?;

    Ok(Redirect::to("/dashboard?notice=incident_created").into_response())
}

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub notice: Option<String>,
}

async fn render_detail(
    resources: &AppResources,
    inc: &incident::Model,
    notice: Option<&'static str>,
    errors: Vec<&'static str>,
    selected_status: Option<IncidentStatus>,
    message_value: String,
) -> Result<Html<String>, PageError> {
    let template = IncidentDetailTemplate {
        company_name: company_name(resources).await,
        notice,
        errors,
        incident: views::incident_view(resources.db.as_ref(), inc).await?,
        status_options: views::incident_status_options(selected_status),
        message_value,
    };
    Ok(Html(template.render()?))
}

/// `GET /dashboard/incident/{id}` - detail plus update form; unknown id is 404.
#[tracing::instrument(skip(resources))]
pub async fn incident_detail(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
    Path(id): Path<i32>,
    Query(query): Query<DetailQuery>,
) -> Result<Html<String>, PageError> {
    let inc = incident::Entity::find_by_id(id)
        .one(resources.db.as_ref())
        .await?
        .ok_or(PageError::NotFound)?;

    let selected = inc.status.parse::<IncidentStatus>().ok();
    render_detail(
        &resources,
        &inc,
        query.notice.as_deref().and_then(views::notice_message),
        Vec::new(),
        selected,
        String::new(),
    )
    .await
}

/// `POST /dashboard/incident/{id}` - post an update, then redirect back with a
/// notice. Invalid input re-renders the page with field errors and HTTP 200.
#[tracing::instrument(skip(resources, form))]
pub async fn incident_update(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
    Path(id): Path<i32>,
    Form(form): Form<UpdateForm>,
) -> Result<Response, PageError> {
    let db = resources.db.as_ref();
    let inc = incident::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(PageError::NotFound)?;

    let mut errors = Vec::new();
    let message = form.message.trim().to_string();
    if message.is_empty() {
        errors.push("Update message must not be empty.");
    }
    let status = form.status.parse::<IncidentStatus>();
    if status.is_err() {
        errors.push("Unknown incident status.");
    }

    let Ok(status) = status else {
        let page = render_detail(&resources, &inc, None, errors, None, message).await?;
        return Ok(page.into_response());
    };

    if !errors.is_empty() {
        let page = render_detail(&resources, &inc, None, errors, Some(status), message).await?;
        return Ok(page.into_response());
    }

    lifecycle::post_update(db, id, status, message).await?;

    Ok(Redirect::to(&format!("/dashboard/incident/{id}?notice=incident_updated")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ServiceStatusForm {
    pub status: String,
}

/// `POST /dashboard/service/{id}/status` - manual status edit; unknown id is 404.
#[tracing::instrument(skip(resources, form))]
pub async fn service_status(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
    Path(id): Path<i32>,
    Form(form): Form<ServiceStatusForm>,
) -> Result<Response, PageError> {
    let Ok(status) = form.status.parse::<ServiceStatus>() else {
        return Ok(Redirect::to("/dashboard?error=invalid_status").into_response());
    };

    lifecycle::set_service_status(resources.db.as_ref(), id, status).await?;

    Ok(Redirect::to("/dashboard?notice=service_updated").into_response())
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub company_name: String,
    pub company_url: String,
    pub logo_url: String,
}

/// `GET /dashboard/settings`
#[tracing::instrument(skip(resources))]
pub async fn settings_page(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
    Query(query): Query<DetailQuery>,
) -> Result<Html<String>, PageError> {
    let current = resources.settings.read().await.clone();
    let template = SettingsTemplate {
        company_name: current.company_name.clone(),
        notice: query.notice.as_deref().and_then(views::notice_message),
        errors: Vec::new(),
        company_name_value: current.company_name,
        company_url_value: current.company_url,
        logo_url_value: current.logo_url,
    };
    Ok(Html(template.render()?))
}

/// `POST /dashboard/settings` - write the singleton row and refresh the cache.
#[tracing::instrument(skip(resources, form))]
pub async fn settings_update(
    Extension(resources): Extension<AppResources>,
    CurrentOperator(_op): CurrentOperator,
    Form(form): Form<SettingsForm>,
) -> Result<Response, PageError> {
    let company_name = form.company_name.trim().to_string();
    if company_name.is_empty() {
        let template = SettingsTemplate {
            company_name: resources.settings.read().await.company_name.clone(),
            notice: None,
            errors: vec!["Company name must not be empty."],
            company_name_value: company_name,
            company_url_value: form.company_url,
            logo_url_value: form.logo_url,
        };
        return Ok(Html(template.render()?).into_response());
    }

    settings::update(
        resources.db.as_ref(),
        &resources.settings,
        company_name,
        form.company_url.trim().to_string(),
        form.logo_url.trim().to_string(),
    )
    .await?;

    Ok(Redirect::to("/dashboard/settings?notice=settings_saved").into_response())
}
