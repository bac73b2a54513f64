//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL-backed record repository using Diesel.

pub mod persistence;
