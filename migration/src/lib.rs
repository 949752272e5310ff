pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_battle_sessions_table;
mod m20250601_000003_create_grid_positions_table;
mod m20250601_000004_create_polygons_table;
mod m20250601_000005_create_nine_liners_table;

/// Schema version stamped into `PRAGMA user_version` once every migration has run.
pub const SCHEMA_VERSION: i32 = 5;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_battle_sessions_table::Migration),
            Box::new(m20250601_000003_create_grid_positions_table::Migration),
            Box::new(m20250601_000004_create_polygons_table::Migration),
            Box::new(m20250601_000005_create_nine_liners_table::Migration),
        ]
    }
}
