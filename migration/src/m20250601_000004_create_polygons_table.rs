use sea_orm_migration::prelude::*;

/// Creates the `polygons` table. Vertices are stored as a JSON coordinate array.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Polygons {
    Table,
    Id,
    Name,
    Coordinates,
    FillColor,
    StrokeColor,
    StrokeWidth,
    FillAlpha,
    IsVisible,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Polygons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Polygons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Polygons::Name).string_len(100).null())
                    .col(ColumnDef::new(Polygons::Coordinates).text().not_null())
                    .col(
                        ColumnDef::new(Polygons::FillColor)
                            .string_len(9)
                            .not_null()
                            .default("#3300FF"),
                    )
                    .col(
                        ColumnDef::new(Polygons::StrokeColor)
                            .string_len(9)
                            .not_null()
                            .default("#0000FF"),
                    )
                    .col(
                        ColumnDef::new(Polygons::StrokeWidth)
                            .float()
                            .not_null()
                            .default(3.0),
                    )
                    .col(
                        ColumnDef::new(Polygons::FillAlpha)
                            .float()
                            .not_null()
                            .default(0.3),
                    )
                    .col(
                        ColumnDef::new(Polygons::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Polygons::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Polygons::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Polygons::Table).to_owned())
            .await
    }
}
