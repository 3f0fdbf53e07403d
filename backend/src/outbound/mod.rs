//! Outbound adapters implementing the domain's repository ports.
//!
//! - **persistence**: PostgreSQL via Diesel and `diesel-async`
//! - **memory**: process-local stores used when no database is configured

pub mod memory;
pub mod persistence;
