use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Operator accounts and their database-backed dashboard sessions.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Operator::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operator::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Operator::Username).not_null().unique_key())
                    .col(string_len(Operator::PasswordHash, 255).not_null())
                    .col(timestamp_with_time_zone(Operator::CreatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Operator::LastLoginAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OperatorSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OperatorSession::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(OperatorSession::OperatorId).not_null())
                    .col(timestamp_with_time_zone(OperatorSession::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(OperatorSession::ExpiresAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operator_session_operator")
                            .from(OperatorSession::Table, OperatorSession::OperatorId)
                            .to(Operator::Table, Operator::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_operator_session_operator_id")
                    .table(OperatorSession::Table)
                    .col(OperatorSession::OperatorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_operator_session_operator_id")
                    .table(OperatorSession::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(OperatorSession::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Operator::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Operator {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
    LastLoginAt,
}

#[derive(Iden)]
enum OperatorSession {
    Table,
    Token,
    OperatorId,
    CreatedAt,
    ExpiresAt,
}
