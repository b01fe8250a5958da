pub mod ads;
pub mod auth;
pub mod docs;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Authentication routes, nested under /api/auth
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

// Ad routes, nested under /api/ads
pub fn ad_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ads::list_ads).post(ads::create_ad))
        .route("/user/{user_id}", get(ads::list_ads_by_user))
        .route(
            "/{id}",
            get(ads::get_ad)
                .patch(ads::update_ad)
                .delete(ads::delete_ad),
        )
        .route("/{id}/impression", post(ads::record_impression))
        .route("/{id}/click", post(ads::record_click))
}
