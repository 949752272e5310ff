use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session difficulty
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Difficulty {
    #[sea_orm(string_value = "Easy")]
    Easy,
    #[default]
    #[sea_orm(string_value = "Normal")]
    Normal,
    #[sea_orm(string_value = "Hard")]
    Hard,
}
