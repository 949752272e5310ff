use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::EntityKind;

/// A token placed on a session's coordinate grid.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grid_positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub entity_name: String,
    pub entity_type: EntityKind,
    pub x_position: i32,
    pub y_position: i32,
    pub health: i32,
    pub max_health: i32,
    pub is_active: bool,
    pub notes: Option<String>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::battle_session::Entity",
        from = "Column::SessionId",
        to = "super::battle_session::Column::Id",
        on_delete = "Cascade"
    )]
    BattleSession,
}

impl Related<super::battle_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BattleSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
