//! Domain types for EdgeLab

pub mod bar;
pub mod position;
pub mod trade;

pub use bar::{closes, PriceBar};
pub use position::{EntryKind, Position};
pub use trade::{ExitReason, Trade};
