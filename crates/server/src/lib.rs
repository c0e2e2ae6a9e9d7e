//! A public status page with an authenticated operator dashboard.
//!
//! Anonymous visitors get the current and historical status of every monitored
//! service; authenticated operators declare incidents, post updates, and set
//! service status by hand. Service history is reconstructed on the fly from
//! incident windows rather than read from stored snapshots.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::entity::site_settings;

pub mod auth;
pub mod config;
pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod settings;
pub mod status;
pub mod web;

/// Shared handles passed to every request handler.
///
/// The site settings singleton is loaded once at startup and kept behind a
/// lock; the dashboard settings form writes the row and swaps the cached copy.
#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub settings: Arc<RwLock<site_settings::Model>>,
}
