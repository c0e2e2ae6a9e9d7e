use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use statuspage::config::load_config_or_panic;
use statuspage::web::start_webserver;
use statuspage::{AppResources, settings};
use tokio::sync::RwLock;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "statuspage=info,sea_orm=info,tower_http=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install().expect("Failed to install `color_eyre::install`");

    initialize_tracing();

    // Load config
    let config = Arc::new(load_config_or_panic());

    // Set up SeaORM database connection and bring the schema up to date
    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to database"),
    );
    Migrator::up(db.as_ref(), None)
        .await
        .expect("Failed to run migrations");

    // Site settings singleton: created on first boot, cached for the
    // process lifetime, refreshed when an operator saves the settings form.
    let site_settings = settings::load_or_init(db.as_ref())
        .await
        .expect("Failed to load site settings");
    tracing::info!(company = %site_settings.company_name, "site settings loaded");

    let resources = AppResources {
        db,
        config,
        settings: Arc::new(RwLock::new(site_settings)),
    };

    start_webserver(resources).await?;
    Ok(())
}
