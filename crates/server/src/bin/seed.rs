//! Seed demo data: site settings, sample services and an admin operator.
//!
//! Idempotent per record - existing rows are left alone, so it is safe to run
//! against a database that already has data.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter};
use statuspage::auth::hash_password;
use statuspage::config::load_config_or_panic;
use statuspage::entity::{operator, service, site_settings};
use statuspage::settings;
use time::OffsetDateTime;
use uuid::Uuid;

const DEMO_SERVICES: [(&str, &str, i32); 5] = [
    ("Website", "Main website and landing pages", 1),
    ("API", "REST API endpoints", 2),
    ("Database", "Primary database cluster", 3),
    ("Email", "Transactional email service", 4),
    ("CDN", "Content delivery network", 5),
];

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    let config = Arc::new(load_config_or_panic());
    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    // Site settings
    let current = settings::load_or_init(&db).await?;
    if current.company_name == "Your Company" {
        let mut active: site_settings::ActiveModel = current.into();
        active.company_name = Set("Acme Inc".to_string());
        let updated = active.update(&db).await?;
        println!("Created site settings: {}", updated.company_name);
    } else {
        println!("Site settings already exist: {}", current.company_name);
    }

    // Sample services
    for (name, description, sort_order) in DEMO_SERVICES {
        let existing = service::Entity::find()
            .filter(service::Column::Name.eq(name))
            .one(&db)
            .await?;
        if existing.is_some() {
            println!("Service already exists: {name}");
            continue;
        }
        service::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            status: Set("operational".to_string()),
            sort_order: Set(sort_order),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        println!("Created service: {name}");
    }

    // Admin operator
    let existing = operator::Entity::find()
        .filter(operator::Column::Username.eq("admin"))
        .one(&db)
        .await?;
    if existing.is_some() {
        println!("Operator already exists: admin");
    } else {
        operator::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set("admin".to_string()),
            password_hash: Set(hash_password("admin").expect("Failed to hash password")),
            created_at: Set(OffsetDateTime::now_utc()),
            last_login_at: Set(None),
        }
        .insert(&db)
        .await?;
        println!("Created operator: admin (password: admin - change it!)");
    }

    println!("\nDemo data setup complete!");
    println!("Visit http://localhost:8080 to see the status page");
    println!("Visit http://localhost:8080/dashboard to manage (admin/admin)");
    Ok(())
}
