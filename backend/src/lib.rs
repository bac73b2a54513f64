//! Record service library: schema-driven CRUD over a single PostgreSQL table.
//!
//! - [`domain`]: record schema, validation, the record service and its ports.
//! - [`outbound`]: Diesel persistence adapter.
//! - [`inbound`]: actix-web handlers and the error envelope.
//! - [`middleware`]: request trace identifiers.
//! - [`settings`]: `USERS_*` configuration.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use doc::ApiDoc;
pub use middleware::Trace;
