//! Site settings singleton.
//!
//! Exactly one row exists, primary key fixed at [`SETTINGS_ID`]. The row is
//! created lazily on first load, read into `AppResources` at startup, and the
//! cached copy is swapped whenever an operator saves the settings form.

use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait};
use tokio::sync::RwLock;

use crate::entity::site_settings;

/// Fixed primary key of the settings row.
pub const SETTINGS_ID: i32 = 1;

/// Fetch the settings row, inserting defaults if it does not exist yet.
pub async fn load_or_init<C: ConnectionTrait>(
    db: &C,
) -> Result<site_settings::Model, sea_orm::DbErr> {
    if let Some(existing) = site_settings::Entity::find_by_id(SETTINGS_ID).one(db).await? {
        return Ok(existing);
    }

    let defaults = site_settings::ActiveModel {
        id: Set(SETTINGS_ID),
        company_name: Set("Your Company".to_string()),
        company_url: Set(String::new()),
        logo_url: Set(String::new()),
    };
    defaults.insert(db).await
}

/// Overwrite the settings row and refresh the cached copy.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    cache: &RwLock<site_settings::Model>,
    company_name: String,
    company_url: String,
    logo_url: String,
) -> Result<site_settings::Model, sea_orm::DbErr> {
    // Ensure the row exists before updating; the id never changes.
    load_or_init(db).await?;

    let updated = site_settings::ActiveModel {
        id: Set(SETTINGS_ID),
        company_name: Set(company_name),
        company_url: Set(company_url),
        logo_url: Set(logo_url),
    }
    .update(db)
    .await?;

    *cache.write().await = updated.clone();
    Ok(updated)
}
