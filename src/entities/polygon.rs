use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A closed map shape. `coordinates` holds the JSON vertex array.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "polygons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub coordinates: String,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub fill_alpha: f32,
    pub is_visible: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
