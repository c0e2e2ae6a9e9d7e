//! A monitored service/component. Listings order by `(sort_order, name)`.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incident_service::Entity")]
    IncidentServices,
    #[sea_orm(has_many = "super::status_history::Entity")]
    StatusHistory,
}

impl Related<super::incident_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncidentServices.def()
    }
}

impl Related<super::status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl Related<super::incident::Entity> for Entity {
    fn to() -> RelationDef {
        super::incident_service::Relation::Incident.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::incident_service::Relation::Service.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
