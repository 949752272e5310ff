use sea_orm_migration::prelude::*;

/// Creates the `battle_sessions` table, owned by a user account.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum BattleSessions {
    Table,
    Id,
    UserId,
    Name,
    Description,
    MapData,
    StartTime,
    EndTime,
    IsCompleted,
    PlayerCount,
    Difficulty,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BattleSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BattleSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BattleSessions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BattleSessions::Name).string_len(100).not_null())
                    .col(ColumnDef::new(BattleSessions::Description).text().null())
                    .col(ColumnDef::new(BattleSessions::MapData).text().null())
                    .col(
                        ColumnDef::new(BattleSessions::StartTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BattleSessions::EndTime).big_integer().null())
                    .col(
                        ColumnDef::new(BattleSessions::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BattleSessions::PlayerCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(BattleSessions::Difficulty)
                            .string_len(10)
                            .not_null()
                            .default("Normal"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_battle_sessions_user_id")
                            .from(BattleSessions::Table, BattleSessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_battle_sessions_user_id")
                    .table(BattleSessions::Table)
                    .col(BattleSessions::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BattleSessions::Table).to_owned())
            .await
    }
}
