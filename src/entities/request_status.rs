use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nine-line request lifecycle status.
///
/// Transitions only move forward: `Draft -> Transmitted -> Archived`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Saved locally, still editable
    #[default]
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Sent; carries a transmission timestamp
    #[sea_orm(string_value = "TRANSMITTED")]
    Transmitted,
    /// Retained for history until the retention cutoff
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RequestStatus {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "TRANSMITTED" => Some(Self::Transmitted),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Transmitted => "TRANSMITTED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// The status a request moves to next, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::Transmitted),
            Self::Transmitted => Some(Self::Archived),
            Self::Archived => None,
        }
    }

    /// Check whether `self -> to` is a defined lifecycle transition
    pub fn can_transition_to(self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Check if the request fields may still be edited
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(RequestStatus::from_str("DRAFT"), Some(RequestStatus::Draft));
        assert_eq!(RequestStatus::from_str("transmitted"), Some(RequestStatus::Transmitted));
        assert_eq!(RequestStatus::from_str("ARCHIVED"), Some(RequestStatus::Archived));
        assert_eq!(RequestStatus::from_str("SENT"), None);
    }

    #[test]
    fn test_forward_transitions_only() {
        assert!(RequestStatus::Draft.can_transition_to(RequestStatus::Transmitted));
        assert!(RequestStatus::Transmitted.can_transition_to(RequestStatus::Archived));
        assert!(!RequestStatus::Draft.can_transition_to(RequestStatus::Archived));
        assert!(!RequestStatus::Transmitted.can_transition_to(RequestStatus::Draft));
        assert!(!RequestStatus::Archived.can_transition_to(RequestStatus::Transmitted));
        assert!(!RequestStatus::Draft.can_transition_to(RequestStatus::Draft));
    }

    #[test]
    fn test_only_drafts_editable() {
        assert!(RequestStatus::Draft.is_editable());
        assert!(!RequestStatus::Transmitted.is_editable());
        assert!(!RequestStatus::Archived.is_editable());
    }

    #[test]
    fn test_default() {
        assert_eq!(RequestStatus::default(), RequestStatus::Draft);
    }
}
