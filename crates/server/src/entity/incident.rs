//! An incident affecting one or more services.
//!
//! `created_at` is immutable, `updated_at` is touched on every write, and
//! `resolved_at` is stamped exactly once on the first transition to resolved.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "incident")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub status: String,
    pub impact: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub resolved_at: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incident_update::Entity")]
    Updates,
    #[sea_orm(has_many = "super::incident_service::Entity")]
    IncidentServices,
}

impl Related<super::incident_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updates.def()
    }
}

impl Related<super::incident_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncidentServices.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        super::incident_service::Relation::Service.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::incident_service::Relation::Incident.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
