//! HTTP inbound adapter exposing the record and health endpoints.

pub mod error;
pub mod health;
pub mod records;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
