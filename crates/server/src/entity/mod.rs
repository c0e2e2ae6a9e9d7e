//! SeaORM entity models for the status page schema.

pub mod incident;
pub mod incident_service;
pub mod incident_update;
pub mod operator;
pub mod operator_session;
pub mod service;
pub mod site_settings;
pub mod status_history;
