use sea_orm_migration::prelude::*;

/// Creates the `grid_positions` table. Rows cascade away with their session.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GridPositions {
    Table,
    Id,
    SessionId,
    EntityName,
    EntityType,
    XPosition,
    YPosition,
    Health,
    MaxHealth,
    IsActive,
    Notes,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BattleSessions {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GridPositions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GridPositions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GridPositions::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GridPositions::EntityName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GridPositions::EntityType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GridPositions::XPosition).integer().not_null())
                    .col(ColumnDef::new(GridPositions::YPosition).integer().not_null())
                    .col(
                        ColumnDef::new(GridPositions::Health)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(GridPositions::MaxHealth)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(GridPositions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(GridPositions::Notes).text().null())
                    .col(
                        ColumnDef::new(GridPositions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grid_positions_session_id")
                            .from(GridPositions::Table, GridPositions::SessionId)
                            .to(BattleSessions::Table, BattleSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grid_positions_session_id")
                    .table(GridPositions::Table)
                    .col(GridPositions::SessionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GridPositions::Table).to_owned())
            .await
    }
}
