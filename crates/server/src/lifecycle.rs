//! Incident lifecycle operations and their service-status side effects.
//!
//! Each operator action is one transaction: the incident write, the update row
//! and every service-status write land together or not at all. Status
//! transitions are permissive - an operator may select any status on any
//! update - but `resolved_at` is stamped exactly once and never overwritten.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, ModelTrait, QueryFilter, TransactionTrait,
};
use thiserror::Error;
use time::OffsetDateTime;

use crate::entity::{incident, incident_service, incident_update, service};
use crate::status::{Impact, IncidentStatus, ServiceStatus};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Validated input for incident creation.
#[derive(Clone, Debug)]
pub struct NewIncident {
    pub title: String,
    pub status: IncidentStatus,
    pub impact: Impact,
    pub service_ids: Vec<i32>,
}

/// Create an incident, its automatic first update, and overwrite the status of
/// every affected service from the incident's impact.
///
/// When a service is affected by several concurrent incidents the last writer
/// wins; there is no merge logic on creation.
#[tracing::instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_incident(
    db: &DatabaseConnection,
    input: NewIncident,
) -> Result<incident::Model, LifecycleError> {
    let now = OffsetDateTime::now_utc();
    let txn = db.begin().await?;

    let created = incident::ActiveModel {
        title: Set(input.title.clone()),
        status: Set(input.status.as_str().to_string()),
        impact: Set(input.impact.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        // An incident born resolved keeps the invariant that resolved implies a timestamp.
        resolved_at: Set((input.status == IncidentStatus::Resolved).then_some(now)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for service_id in &input.service_ids {
        incident_service::ActiveModel {
            incident_id: Set(created.id),
            service_id: Set(*service_id),
        }
        .insert(&txn)
        .await?;
    }

    incident_update::ActiveModel {
        incident_id: Set(created.id),
        status: Set(input.status.as_str().to_string()),
        message: Set(format!("Incident created: {}", created.title)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let new_status = input.impact.service_status();
    for service_id in &input.service_ids {
        set_status_in_txn(&txn, *service_id, new_status).await?;
    }

    txn.commit().await?;
    tracing::info!(incident = created.id, "incident created");
    Ok(created)
}

/// Post an operator update against an incident.
///
/// The incident's status always mirrors its most recent update. On the first
/// transition to resolved the incident is stamped with `resolved_at` and every
/// affected service's status is recomputed from the incidents still unresolved
/// against it - the highest remaining impact wins, and a service with nothing
/// left against it returns to operational.
#[tracing::instrument(skip(db, message))]
pub async fn post_update(
    db: &DatabaseConnection,
    incident_id: i32,
    status: IncidentStatus,
    message: String,
) -> Result<incident::Model, LifecycleError> {
    let txn = db.begin().await?;

    let Some(existing) = incident::Entity::find_by_id(incident_id).one(&txn).await? else {
        return Err(LifecycleError::NotFound);
    };

    let now = OffsetDateTime::now_utc();

    incident_update::ActiveModel {
        incident_id: Set(incident_id),
        status: Set(status.as_str().to_string()),
        message: Set(message),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let newly_resolved = status == IncidentStatus::Resolved && existing.resolved_at.is_none();

    let mut active: incident::ActiveModel = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(now);
    if newly_resolved {
        active.resolved_at = Set(Some(now));
    }
    let updated = active.update(&txn).await?;

    if newly_resolved {
        let affected = updated.find_related(service::Entity).all(&txn).await?;
        for svc in affected {
            let status = remaining_status(&txn, svc.id).await?;
            set_status_in_txn(&txn, svc.id, status).await?;
        }
    }

    txn.commit().await?;
    tracing::info!(incident = incident_id, status = %status, "incident update posted");
    Ok(updated)
}

/// Manual operator edit of one service's status, independent of any incident.
#[tracing::instrument(skip(db))]
pub async fn set_service_status(
    db: &DatabaseConnection,
    service_id: i32,
    status: ServiceStatus,
) -> Result<service::Model, LifecycleError> {
    let Some(svc) = service::Entity::find_by_id(service_id).one(db).await? else {
        return Err(LifecycleError::NotFound);
    };

    let mut active: service::ActiveModel = svc.into();
    active.status = Set(status.as_str().to_string());
    Ok(active.update(db).await?)
}

/// Status a service should carry given the incidents still unresolved against it.
async fn remaining_status(
    txn: &DatabaseTransaction,
    service_id: i32,
) -> Result<ServiceStatus, DbErr> {
    let Some(svc) = service::Entity::find_by_id(service_id).one(txn).await? else {
        // Row vanished mid-transaction; nothing to compute.
        return Ok(ServiceStatus::Operational);
    };

    let open_incidents = svc
        .find_related(incident::Entity)
        .filter(incident::Column::Status.ne(IncidentStatus::Resolved.as_str()))
        .all(txn)
        .await?;

    let worst = open_incidents
        .iter()
        .filter_map(|inc| inc.impact.parse::<Impact>().ok())
        .max_by_key(|impact| impact.priority());

    Ok(worst.map_or(ServiceStatus::Operational, Impact::service_status))
}

async fn set_status_in_txn<C: ConnectionTrait>(
    txn: &C,
    service_id: i32,
    status: ServiceStatus,
) -> Result<(), DbErr> {
    if let Some(svc) = service::Entity::find_by_id(service_id).one(txn).await? {
        let mut active: service::ActiveModel = svc.into();
        active.status = Set(status.as_str().to_string());
        active.update(txn).await?;
    }
    Ok(())
}
