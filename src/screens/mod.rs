//! Headless screen controllers.
//!
//! Each screen observes live queries, holds the transient form state a UI
//! would bind to, and turns user actions into repository calls.

pub mod controls_screen;
pub mod map_screen;
pub mod user_screen;

pub use controls_screen::ControlsScreen;
pub use map_screen::MapScreen;
pub use user_screen::UserScreen;
