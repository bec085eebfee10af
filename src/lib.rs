//! liftlog - Strength training log
//!
//! Personal records and weekly volume derived from per-day workout logs.

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;
pub mod progress;
pub mod tui;

pub use db::{Database, DaySource};
pub use error::{ErrorKind, ProgressError};
