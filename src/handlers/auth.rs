// Authentication handlers: register and npub login.
//
// There are no server-side sessions and no password verification; key
// ownership is proven client-side, so login is just a lookup by npub.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    app::AppState,
    models::user::{LoginRequest, NewUser, RegisterRequest, UserResponse},
    storage::StorageError,
    utils::ApiError,
};

/// Create a user record for an npub identity
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    operation_id = "register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid data or duplicate npub/username"),
        (status = 500, description = "Failed to register user")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid data"))?;
    request.validate()?;

    let existing = state
        .storage
        .user_by_npub(&request.npub)
        .await
        .map_err(|e| ApiError::internal("Failed to register user", e))?;
    if existing.is_some() {
        return Err(ApiError::bad_request("User with this npub already exists"));
    }

    let user = state
        .storage
        .create_user(NewUser::from(request))
        .await
        .map_err(|e| match e {
            StorageError::Duplicate(column) => {
                ApiError::bad_request(format!("User with this {} already exists", column))
            },
            other => ApiError::internal("Failed to register user", other),
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Fetch the user record for an npub
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    operation_id = "login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "npub is required"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Failed to login")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid data"))?;

    let npub = request
        .npub
        .filter(|npub| !npub.is_empty())
        .ok_or_else(|| ApiError::bad_request("npub is required"))?;

    let user = state
        .storage
        .user_by_npub(&npub)
        .await
        .map_err(|e| ApiError::internal("Failed to login", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
