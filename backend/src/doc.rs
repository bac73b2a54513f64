//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the record routes, the health probes and the schema
//! wrappers from [`crate::inbound::http::schemas`]. The document is served by
//! Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    DeletedSchema, ErrorCodeSchema, ErrorSchema, RecordSchemaDoc,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Record service API",
        description = "CRUD access to user records whose fields come from a configured schema."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::records::create_user,
        crate::inbound::http::records::list_users,
        crate::inbound::http::records::get_user,
        crate::inbound::http::records::replace_user,
        crate::inbound::http::records::patch_user,
        crate::inbound::http::records::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(RecordSchemaDoc, DeletedSchema, ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "User record CRUD"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
