use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of nine-line request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum RequestType {
    /// Close air support
    #[default]
    #[sea_orm(string_value = "CAS")]
    #[serde(rename = "CAS")]
    Cas,
    /// Medical evacuation
    #[sea_orm(string_value = "MEDEVAC")]
    #[serde(rename = "MEDEVAC")]
    Medevac,
    #[sea_orm(string_value = "FIRE SUPPORT")]
    #[serde(rename = "FIRE SUPPORT")]
    FireSupport,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestType {
    /// All request types in form order
    pub const ALL: [Self; 3] = [Self::Cas, Self::Medevac, Self::FireSupport];

    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace(['_', '-'], " ").as_str() {
            "CAS" => Some(Self::Cas),
            "MEDEVAC" => Some(Self::Medevac),
            "FIRE SUPPORT" => Some(Self::FireSupport),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cas => "CAS",
            Self::Medevac => "MEDEVAC",
            Self::FireSupport => "FIRE SUPPORT",
        }
    }
}
