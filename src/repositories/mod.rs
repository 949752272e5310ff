pub mod account_repository;
pub mod nine_line_repository;
pub mod polygon_repository;
pub mod session_repository;

pub use account_repository::{AccountRepository, AccountUpdate};
pub use nine_line_repository::{NineLineDraft, NineLineRepository, TransmitOutcome};
pub use polygon_repository::{PolygonRepository, PolygonStyle};
pub use session_repository::{
    NewPosition, NewSession, PositionUpdate, SessionRepository, SessionUpdate,
};
