//! BattleGrid - local store for tactical map planning
//!
//! This crate provides the headless core of BattleGrid:
//! - A SQLite store with accounts, sessions, grid positions, polygons and 9-line requests
//! - Repositories with validation, request lifecycle and polygon vertex encoding
//! - Live queries that push the latest committed rows to subscribers
//! - Screen controllers for the map, the 9-line form and user management

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod live;
pub mod map;
pub mod repositories;
pub mod screens;
pub mod state;
pub mod utils;
