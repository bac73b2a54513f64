//! User record CRUD handlers.
//!
//! ```text
//! POST   /users        {"name":"Ann","age":30,"occupation":"engineer"}
//! GET    /users
//! GET    /users/{id}
//! PUT    /users/{id}   {"name":"Ann","age":31,"occupation":"pilot"}
//! PATCH  /users/{id}   {"age":31}
//! DELETE /users/{id}
//! ```
//!
//! Path ids arrive as raw strings; parsing and payload validation happen in
//! the record service so every route reports them the same way.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde_json::{Value, json};

use crate::domain::Record;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DeletedSchema, ErrorSchema, RecordSchemaDoc};
use crate::inbound::http::state::HttpState;

/// Confirmation message returned by a successful delete.
pub const DELETED_MESSAGE: &str = "User deleted successfully";

/// Create a record from the fields named by the active schema.
#[utoipa::path(
    post,
    path = "/users",
    request_body(content = Object, description = "Field values keyed by column name"),
    responses(
        (status = 201, description = "Record created", body = RecordSchemaDoc),
        (status = 400, description = "Invalid body or field", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let record = state.records_command.create_record(&payload).await?;
    Ok(HttpResponse::Created().json(record))
}

/// List every record in ascending id order.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All records", body = [RecordSchemaDoc]),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Record>>> {
    Ok(web::Json(state.records.list_records().await?))
}

/// Fetch one record by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Integer record id")),
    responses(
        (status = 200, description = "Record", body = RecordSchemaDoc),
        (status = 400, description = "Id is not an integer", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Record>> {
    Ok(web::Json(state.records.fetch_record(&path).await?))
}

/// Replace every schema field of a record.
///
/// Required fields must be present; omitted optional fields are cleared.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Integer record id")),
    request_body(content = Object, description = "Complete field values"),
    responses(
        (status = 200, description = "Updated record", body = RecordSchemaDoc),
        (status = 400, description = "Invalid id, body or field", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Record>> {
    Ok(web::Json(
        state.records_command.replace_record(&path, &payload).await?,
    ))
}

/// Update only the supplied fields of a record.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Integer record id")),
    request_body(content = Object, description = "At least one field value"),
    responses(
        (status = 200, description = "Updated record", body = RecordSchemaDoc),
        (status = 400, description = "Invalid id, no fields or bad field", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Record>> {
    Ok(web::Json(
        state.records_command.patch_record(&path, &payload).await?,
    ))
}

/// Delete a record by id.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Integer record id")),
    responses(
        (status = 200, description = "Record deleted", body = DeletedSchema),
        (status = 400, description = "Id is not an integer", body = ErrorSchema),
        (status = 404, description = "No such record", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.records_command.delete_record(&path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": DELETED_MESSAGE })))
}

/// Register the record routes and their JSON body configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use record_service::inbound::http::records;
///
/// let app = App::new().configure(records::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(super::error::json_error_handler))
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(replace_user)
        .service(patch_user)
        .service(delete_user);
}
