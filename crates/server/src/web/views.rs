//! View models shared between the public page and the dashboard templates.
//!
//! Templates only see flat, display-ready strings; all parsing and DB access
//! happens here or in the handlers.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, ModelTrait, QueryOrder};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::entity::{incident, incident_update, service};
use crate::status::timeline::HourlyStatus;
use crate::status::{Impact, IncidentStatus, ServiceStatus};

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
    ts.format(&format).unwrap_or_else(|_| ts.to_string())
}

fn format_hour(ts: OffsetDateTime) -> String {
    let format = format_description!("[month]-[day] [hour]:00 UTC");
    ts.format(&format).unwrap_or_else(|_| ts.to_string())
}

/// `<option>` entry for a status or impact select.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn service_status_options(selected: Option<ServiceStatus>) -> Vec<SelectOption> {
    ServiceStatus::ALL
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: status.label(),
            selected: selected == Some(status),
        })
        .collect()
}

pub fn incident_status_options(selected: Option<IncidentStatus>) -> Vec<SelectOption> {
    IncidentStatus::ALL
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: status.label(),
            selected: selected == Some(status),
        })
        .collect()
}

pub fn impact_options(selected: Option<Impact>) -> Vec<SelectOption> {
    Impact::ALL
        .into_iter()
        .map(|impact| SelectOption {
            value: impact.as_str(),
            label: impact.label(),
            selected: selected == Some(impact),
        })
        .collect()
}

/// Success notices are passed between redirects as fixed keys, never free text.
pub fn notice_message(key: &str) -> Option<&'static str> {
    match key {
        "incident_created" => Some("Incident created successfully."),
        "incident_updated" => Some("Incident updated successfully."),
        "service_updated" => Some("Service status updated."),
        "settings_saved" => Some("Site settings saved."),
        _ => None,
    }
}

/// One hourly cell of a service's timeline strip.
pub struct HourCell {
    pub label: String,
    pub status: &'static str,
    pub incident: String,
}

impl From<HourlyStatus> for HourCell {
    fn from(bucket: HourlyStatus) -> Self {
        Self {
            label: format_hour(bucket.hour),
            status: bucket.status.as_str(),
            incident: bucket.incident,
        }
    }
}

pub struct UpdateView {
    pub status_label: String,
    pub message: String,
    pub created_at: String,
}

pub struct IncidentView {
    pub id: i32,
    pub title: String,
    pub status_label: String,
    pub impact_label: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
    pub service_names: Vec<String>,
    pub updates: Vec<UpdateView>,
}

fn status_label(value: &str) -> String {
    value
        .parse::<IncidentStatus>()
        .map(|s| s.label().to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn impact_label(value: &str) -> String {
    value
        .parse::<Impact>()
        .map(|i| i.label().to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Build the display model for one incident, loading its updates (newest first)
/// and affected service names.
pub async fn incident_view<C: ConnectionTrait>(
    db: &C,
    inc: &incident::Model,
) -> Result<IncidentView, DbErr> {
    let updates = inc
        .find_related(incident_update::Entity)
        .order_by_desc(incident_update::Column::CreatedAt)
        .order_by_desc(incident_update::Column::Id)
        .all(db)
        .await?;

    let services = inc
        .find_related(service::Entity)
        .order_by_asc(service::Column::SortOrder)
        .order_by_asc(service::Column::Name)
        .all(db)
        .await?;

    Ok(IncidentView {
        id: inc.id,
        title: inc.title.clone(),
        status_label: status_label(&inc.status),
        impact_label: impact_label(&inc.impact),
        created_at: format_timestamp(inc.created_at),
        resolved_at: inc.resolved_at.map(format_timestamp),
        service_names: services.into_iter().map(|s| s.name).collect(),
        updates: updates
            .into_iter()
            .map(|u| UpdateView {
                status_label: status_label(&u.status),
                message: u.message,
                created_at: format_timestamp(u.created_at),
            })
            .collect(),
    })
}

pub async fn incident_views<C: ConnectionTrait>(
    db: &C,
    incidents: &[incident::Model],
) -> Result<Vec<IncidentView>, DbErr> {
    let mut views = Vec::with_capacity(incidents.len());
    for inc in incidents {
        views.push(incident_view(db, inc).await?);
    }
    Ok(views)
}
