pub mod color;
pub mod time;
pub mod validation;

pub use color::is_hex_color;
pub use time::{now_millis, retention_cutoff};
pub use validation::{validate_email, validate_username};
