// Ad CRUD and engagement counter handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    app::AppState,
    models::ad::{
        Ad, ClickCountResponse, CreateAdRequest, ImpressionCountResponse, NewAd, UpdateAdRequest,
    },
    utils::ApiError,
};

/// Reject non-numeric path segments with the documented 400 body.
fn parse_id(
    path: Result<Path<i32>, PathRejection>,
    message: &'static str,
) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::bad_request(message))
}

/// List all ads
/// GET /api/ads
#[utoipa::path(
    get,
    path = "/api/ads",
    tag = "Ads",
    operation_id = "listAds",
    responses(
        (status = 200, description = "All ads", body = [Ad]),
        (status = 500, description = "Failed to fetch ads")
    )
)]
pub async fn list_ads(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ads = state
        .storage
        .all_ads()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch ads", e))?;
    Ok(Json(ads))
}

/// List ads owned by a user
/// GET /api/ads/user/{userId}
#[utoipa::path(
    get,
    path = "/api/ads/user/{userId}",
    tag = "Ads",
    operation_id = "listAdsByUser",
    params(("userId" = i32, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Ads owned by the user", body = [Ad]),
        (status = 400, description = "Invalid user ID"),
        (status = 500, description = "Failed to fetch user ads")
    )
)]
pub async fn list_ads_by_user(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_id(path, "Invalid user ID")?;
    let ads = state
        .storage
        .ads_by_user(user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user ads", e))?;
    Ok(Json(ads))
}

/// Create a new ad
/// POST /api/ads
#[utoipa::path(
    post,
    path = "/api/ads",
    tag = "Ads",
    operation_id = "createAd",
    request_body = CreateAdRequest,
    responses(
        (status = 201, description = "Ad created", body = Ad),
        (status = 400, description = "Invalid data or missing owner"),
        (status = 500, description = "Failed to create ad")
    )
)]
pub async fn create_ad(
    State(state): State<AppState>,
    payload: Result<Json<CreateAdRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid data"))?;
    request.validate()?;

    // Owner existence is checked opportunistically on creation only
    if let Some(user_id) = request.user_id {
        let owner = state
            .storage
            .user(user_id)
            .await
            .map_err(|e| ApiError::internal("Failed to create ad", e))?;
        if owner.is_none() {
            return Err(ApiError::bad_request("Referenced user does not exist"));
        }
    }

    let ad = state
        .storage
        .create_ad(NewAd::from(request))
        .await
        .map_err(|e| ApiError::internal("Failed to create ad", e))?;

    Ok((StatusCode::CREATED, Json(ad)))
}

/// Fetch one ad
/// GET /api/ads/{id}
#[utoipa::path(
    get,
    path = "/api/ads/{id}",
    tag = "Ads",
    operation_id = "getAd",
    params(("id" = i32, Path, description = "Ad ID")),
    responses(
        (status = 200, description = "The ad", body = Ad),
        (status = 400, description = "Invalid ad ID"),
        (status = 404, description = "Ad not found"),
        (status = 500, description = "Failed to fetch ad")
    )
)]
pub async fn get_ad(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, "Invalid ad ID")?;
    let ad = state
        .storage
        .ad(id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch ad", e))?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;
    Ok(Json(ad))
}

/// Merge supplied fields over an existing ad
/// PATCH /api/ads/{id}
#[utoipa::path(
    patch,
    path = "/api/ads/{id}",
    tag = "Ads",
    operation_id = "updateAd",
    params(("id" = i32, Path, description = "Ad ID")),
    request_body = UpdateAdRequest,
    responses(
        (status = 200, description = "Updated ad", body = Ad),
        (status = 400, description = "Invalid ad ID or invalid data"),
        (status = 404, description = "Ad not found"),
        (status = 500, description = "Failed to update ad")
    )
)]
pub async fn update_ad(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateAdRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, "Invalid ad ID")?;
    let Json(request) = payload.map_err(|_| ApiError::bad_request("Invalid data"))?;
    request.validate()?;

    let ad = state
        .storage
        .update_ad(id, request)
        .await
        .map_err(|e| ApiError::internal("Failed to update ad", e))?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;
    Ok(Json(ad))
}

/// Delete an ad, irreversibly
/// DELETE /api/ads/{id}
#[utoipa::path(
    delete,
    path = "/api/ads/{id}",
    tag = "Ads",
    operation_id = "deleteAd",
    params(("id" = i32, Path, description = "Ad ID")),
    responses(
        (status = 204, description = "Ad deleted"),
        (status = 400, description = "Invalid ad ID"),
        (status = 404, description = "Ad not found"),
        (status = 500, description = "Failed to delete ad")
    )
)]
pub async fn delete_ad(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, "Invalid ad ID")?;
    let deleted = state
        .storage
        .delete_ad(id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete ad", e))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Ad not found"))
    }
}

/// Record one impression
/// POST /api/ads/{id}/impression
#[utoipa::path(
    post,
    path = "/api/ads/{id}/impression",
    tag = "Ads",
    operation_id = "recordImpression",
    params(("id" = i32, Path, description = "Ad ID")),
    responses(
        (status = 200, description = "New impression count", body = ImpressionCountResponse),
        (status = 400, description = "Invalid ad ID"),
        (status = 404, description = "Ad not found"),
        (status = 500, description = "Failed to record impression")
    )
)]
pub async fn record_impression(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, "Invalid ad ID")?;
    let ad = state
        .storage
        .increment_impressions(id)
        .await
        .map_err(|e| ApiError::internal("Failed to record impression", e))?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;
    Ok(Json(ImpressionCountResponse {
        impressions: ad.impressions,
    }))
}

/// Record one click
/// POST /api/ads/{id}/click
#[utoipa::path(
    post,
    path = "/api/ads/{id}/click",
    tag = "Ads",
    operation_id = "recordClick",
    params(("id" = i32, Path, description = "Ad ID")),
    responses(
        (status = 200, description = "New click count", body = ClickCountResponse),
        (status = 400, description = "Invalid ad ID"),
        (status = 404, description = "Ad not found"),
        (status = 500, description = "Failed to record click")
    )
)]
pub async fn record_click(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path, "Invalid ad ID")?;
    let ad = state
        .storage
        .increment_clicks(id)
        .await
        .map_err(|e| ApiError::internal("Failed to record click", e))?
        .ok_or_else(|| ApiError::not_found("Ad not found"))?;
    Ok(Json(ClickCountResponse { clicks: ad.clicks }))
}
