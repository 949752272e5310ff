use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a grid token represents
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[sea_orm(string_value = "player")]
    Player,
    #[sea_orm(string_value = "monster")]
    Monster,
    #[sea_orm(string_value = "npc")]
    Npc,
    #[sea_orm(string_value = "object")]
    Object,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Monster => "monster",
            Self::Npc => "npc",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}
