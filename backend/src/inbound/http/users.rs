//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! POST   /api/users      {"firstName":"Ann","lastName":"Lee","phone":"5551234567","email":"ann@ex.com"}
//! PUT    /api/users/{id} {"phone":"5559876543"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    new_user_from_payload, parse_user_id, patch_from_payload,
};

/// Request body shared by create and update.
///
/// Every field is optional at the wire level so missing fields can be
/// reported per field on create and skipped on update. Unknown keys such as
/// `id` or `createdAt` are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[schema(example = "Ann")]
    pub(crate) first_name: Option<String>,
    #[schema(example = "Lee")]
    pub(crate) last_name: Option<String>,
    #[schema(example = "5551234567")]
    pub(crate) phone: Option<String>,
    #[schema(example = "ann@ex.com")]
    pub(crate) email: Option<String>,
}

/// List every stored user record.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use records_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Create a user record; all four fields are required.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Validation failed or email already in use", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let new_user = new_user_from_payload(payload.into_inner())?;
    let user = state.users.create_user(new_user).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Partially update a user record. Absent or `null` fields keep their
/// stored values.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserSchema),
        (status = 400, description = "Validation failed or email already in use", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    let patch = patch_from_payload(payload.into_inner())?;
    if patch.is_empty() {
        debug!(%id, "update carries no recognised fields");
    }
    let user = state.users.update_user(id, patch).await?;
    Ok(web::Json(user))
}

/// Hard-delete a user record.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    state.users.delete_user(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
