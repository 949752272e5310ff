use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{RequestStatus, RequestType};

/// A nine-line request record.
///
/// For CAS the lines are: IP/BP, heading/offset, distance, target elevation,
/// target description, target location (MGRS), type mark, friendlies, egress.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nine_liners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub request_type: RequestType,
    pub line1: String,
    pub line2: String,
    pub line3: String,
    pub line4: String,
    pub line5: String,
    pub line6: String,
    pub line7: String,
    pub line8: String,
    pub line9: String,
    pub status: RequestStatus,
    pub created_at: i64,
    pub transmitted_at: Option<i64>,
    /// Loose reference to `users.id`
    pub created_by: Option<i64>,
}

impl Model {
    /// The nine line fields in order.
    #[must_use]
    pub fn lines(&self) -> [&str; 9] {
        [
            &self.line1,
            &self.line2,
            &self.line3,
            &self.line4,
            &self.line5,
            &self.line6,
            &self.line7,
            &self.line8,
            &self.line9,
        ]
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
