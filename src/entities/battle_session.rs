use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "battle_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Free-form JSON map configuration
    pub map_data: Option<String>,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub is_completed: bool,
    pub player_count: i32,
    pub difficulty: Difficulty,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::UserId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(has_many = "super::grid_position::Entity")]
    GridPositions,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::grid_position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GridPositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
