use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Initial schema: site settings singleton, monitored services, incidents with
/// their updates and affected-service links, and the reserved hourly history table.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteSettings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(SiteSettings::CompanyName).not_null())
                    .col(string(SiteSettings::CompanyUrl).not_null().default(""))
                    .col(string(SiteSettings::LogoUrl).not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(pk_auto(Service::Id))
                    .col(string(Service::Name).not_null())
                    .col(text(Service::Description).not_null().default(""))
                    .col(
                        string_len(Service::Status, 20)
                            .not_null()
                            .default("operational"),
                    )
                    .col(integer(Service::SortOrder).not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Incident::Table)
                    .if_not_exists()
                    .col(pk_auto(Incident::Id))
                    .col(string(Incident::Title).not_null())
                    .col(
                        string_len(Incident::Status, 20)
                            .not_null()
                            .default("investigating"),
                    )
                    .col(string_len(Incident::Impact, 20).not_null().default("minor"))
                    .col(timestamp_with_time_zone(Incident::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Incident::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Incident::ResolvedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_created_at")
                    .table(Incident::Table)
                    .col(Incident::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_status")
                    .table(Incident::Table)
                    .col(Incident::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncidentService::Table)
                    .if_not_exists()
                    .col(integer(IncidentService::IncidentId).not_null())
                    .col(integer(IncidentService::ServiceId).not_null())
                    .primary_key(
                        Index::create()
                            .col(IncidentService::IncidentId)
                            .col(IncidentService::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_service_incident")
                            .from(IncidentService::Table, IncidentService::IncidentId)
                            .to(Incident::Table, Incident::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_service_service")
                            .from(IncidentService::Table, IncidentService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IncidentUpdate::Table)
                    .if_not_exists()
                    .col(pk_auto(IncidentUpdate::Id))
                    .col(integer(IncidentUpdate::IncidentId).not_null())
                    .col(string_len(IncidentUpdate::Status, 20).not_null())
                    .col(text(IncidentUpdate::Message).not_null())
                    .col(timestamp_with_time_zone(IncidentUpdate::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_update_incident")
                            .from(IncidentUpdate::Table, IncidentUpdate::IncidentId)
                            .to(Incident::Table, Incident::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incident_update_incident_id")
                    .table(IncidentUpdate::Table)
                    .col(IncidentUpdate::IncidentId)
                    .to_owned(),
            )
            .await?;

        // Reserved for snapshot-based history; nothing writes it yet.
        manager
            .create_table(
                Table::create()
                    .table(StatusHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(StatusHistory::Id))
                    .col(integer(StatusHistory::ServiceId).not_null())
                    .col(string_len(StatusHistory::Status, 20).not_null())
                    .col(integer_null(StatusHistory::IncidentId))
                    .col(timestamp_with_time_zone(StatusHistory::RecordedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_service")
                            .from(StatusHistory::Table, StatusHistory::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_incident")
                            .from(StatusHistory::Table, StatusHistory::IncidentId)
                            .to(Incident::Table, Incident::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_status_history_service_recorded_at")
                    .table(StatusHistory::Table)
                    .col(StatusHistory::ServiceId)
                    .col(StatusHistory::RecordedAt)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncidentUpdate::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncidentService::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incident::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Service::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SiteSettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SiteSettings {
    Table,
    Id,
    CompanyName,
    CompanyUrl,
    LogoUrl,
}

#[derive(Iden)]
enum Service {
    Table,
    Id,
    Name,
    Description,
    Status,
    SortOrder,
}

#[derive(Iden)]
enum Incident {
    Table,
    Id,
    Title,
    Status,
    Impact,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
}

#[derive(Iden)]
enum IncidentService {
    Table,
    IncidentId,
    ServiceId,
}

#[derive(Iden)]
enum IncidentUpdate {
    Table,
    Id,
    IncidentId,
    Status,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum StatusHistory {
    Table,
    Id,
    ServiceId,
    Status,
    IncidentId,
    RecordedAt,
}
