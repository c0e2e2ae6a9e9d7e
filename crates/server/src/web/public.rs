//! Public status page for anonymous visitors.

use askama::Template;
use axum::Extension;
use axum::response::Html;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use time::OffsetDateTime;

use crate::AppResources;
use crate::entity::{incident, service};
use crate::error::PageError;
use crate::status::aggregate::overall_status;
use crate::status::{IncidentStatus, ServiceStatus};
use crate::status::timeline::service_timeline;
use crate::web::views::{self, HourCell, IncidentView};

struct ServiceStrip {
    name: String,
    description: String,
    status: String,
    status_label: String,
    history: Vec<HourCell>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    company_name: String,
    company_url: String,
    logo_url: String,
    overall_status: &'static str,
    overall_message: &'static str,
    services: Vec<ServiceStrip>,
    active_incidents: Vec<IncidentView>,
    resolved_incidents: Vec<IncidentView>,
}

/// `GET /` - aggregate banner, per-service 24h timelines, incident lists.
#[tracing::instrument(skip(resources))]
pub async fn index(
    Extension(resources): Extension<AppResources>,
) -> Result<Html<String>, PageError> {
    let db = resources.db.as_ref();
    let settings = resources.settings.read().await.clone();
    let now = OffsetDateTime::now_utc();

    let services = service::Entity::find()
        .order_by_asc(service::Column::SortOrder)
        .order_by_asc(service::Column::Name)
        .all(db)
        .await?;

    let (overall, overall_message) = overall_status(&services);

    let mut strips = Vec::with_capacity(services.len());
    for svc in &services {
        let history = service_timeline(db, svc, now).await?;
        strips.push(ServiceStrip {
            name: svc.name.clone(),
            description: svc.description.clone(),
            status: svc.status.clone(),
            status_label: svc
                .status
                .parse::<ServiceStatus>()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|_| svc.status.clone()),
            history: history.into_iter().map(HourCell::from).collect(),
        });
    }

    let active = incident::Entity::find()
        .filter(incident::Column::Status.ne(IncidentStatus::Resolved.as_str()))
        .order_by_desc(incident::Column::CreatedAt)
        .all(db)
        .await?;

    let resolved = incident::Entity::find()
        .filter(incident::Column::Status.eq(IncidentStatus::Resolved.as_str()))
        .order_by_desc(incident::Column::ResolvedAt)
        .all(db)
        .await?;

    let template = IndexTemplate {
        company_name: settings.company_name,
        company_url: settings.company_url,
        logo_url: settings.logo_url,
        overall_status: overall.as_str(),
        overall_message,
        services: strips,
        active_incidents: views::incident_views(db, &active).await?,
        resolved_incidents: views::incident_views(db, &resolved).await?,
    };

    Ok(Html(template.render()?))
}
