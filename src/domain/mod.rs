// src/domain/mod.rs
pub mod admission;
pub mod auctions;
pub mod bids;
pub mod commands;
pub mod core;
pub mod lifecycle;

pub use self::admission::*;
pub use self::auctions::*;
pub use self::bids::*;
pub use self::commands::*;
pub use self::core::*;
