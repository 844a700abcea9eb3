//! Core domain types and logic.

pub mod trade;
pub mod classify;
pub mod clock;
pub mod summary;
pub mod error;
