use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered operator. Deactivated accounts keep their row and username.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub level: i32,
    pub experience: i32,
    pub created_at: i64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::battle_session::Entity")]
    BattleSessions,
}

impl Related<super::battle_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BattleSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
