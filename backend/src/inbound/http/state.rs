//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` so they depend only on the record
//! ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::RecordService;
use crate::domain::ports::{RecordsCommand, RecordsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub records: Arc<dyn RecordsQuery>,
    pub records_command: Arc<dyn RecordsCommand>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(records: Arc<dyn RecordsQuery>, records_command: Arc<dyn RecordsCommand>) -> Self {
        Self {
            records,
            records_command,
        }
    }

    /// Serve both ports from one record service.
    pub fn from_service(service: RecordService) -> Self {
        let service = Arc::new(service);
        Self::new(service.clone(), service)
    }
}
