pub mod account;
pub mod battle_session;
pub mod difficulty;
pub mod entity_kind;
pub mod grid_position;
pub mod nine_liner;
pub mod polygon;
pub mod request_status;
pub mod request_type;

pub use difficulty::Difficulty;
pub use entity_kind::EntityKind;
pub use request_status::RequestStatus;
pub use request_type::RequestType;
