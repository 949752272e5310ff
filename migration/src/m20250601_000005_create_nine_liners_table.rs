use sea_orm_migration::prelude::*;

/// Creates the `nine_liners` table for CAS, MEDEVAC and fire support requests.
///
/// `created_by` is a loose reference to `users.id`; requests outlive their author.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum NineLiners {
    Table,
    Id,
    RequestType,
    Line1,
    Line2,
    Line3,
    Line4,
    Line5,
    Line6,
    Line7,
    Line8,
    Line9,
    Status,
    CreatedAt,
    TransmittedAt,
    CreatedBy,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(NineLiners::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(NineLiners::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(NineLiners::RequestType)
                    .string_len(20)
                    .not_null(),
            );

        for line in [
            NineLiners::Line1,
            NineLiners::Line2,
            NineLiners::Line3,
            NineLiners::Line4,
            NineLiners::Line5,
            NineLiners::Line6,
            NineLiners::Line7,
            NineLiners::Line8,
            NineLiners::Line9,
        ] {
            table.col(ColumnDef::new(line).text().not_null().default(""));
        }

        table
            .col(
                ColumnDef::new(NineLiners::Status)
                    .string_len(20)
                    .not_null()
                    .default("DRAFT"),
            )
            .col(ColumnDef::new(NineLiners::CreatedAt).big_integer().not_null())
            .col(ColumnDef::new(NineLiners::TransmittedAt).big_integer().null())
            .col(ColumnDef::new(NineLiners::CreatedBy).big_integer().null());

        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_nine_liners_status_created_at")
                    .table(NineLiners::Table)
                    .col(NineLiners::Status)
                    .col(NineLiners::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NineLiners::Table).to_owned())
            .await
    }
}
