//! HTTP server configuration object.

use std::net::SocketAddr;

use record_service::domain::RecordService;

/// Everything `create_server` needs besides health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) records: RecordService,
}

impl ServerConfig {
    /// Serve `records` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, records: RecordService) -> Self {
        Self { bind_addr, records }
    }
}
