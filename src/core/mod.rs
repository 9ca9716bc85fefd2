//! Core business logic, independent of the Discord front end.

/// Per-user budget categories
pub mod category;
/// Display formatting and dashboard quick stats
pub mod report;
/// Monthly aggregation over the transaction ledger
pub mod stats;
/// Transaction validation and storage
pub mod transaction;
/// User registration
pub mod user;
