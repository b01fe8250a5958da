// OpenAPI specification and embedded Swagger UI

use axum::{
    response::{Html, IntoResponse},
    Json,
};
use utoipa::OpenApi;

use crate::models::{
    Ad, ClickCountResponse, CreateAdRequest, ImpressionCountResponse, LoginRequest,
    RegisterRequest, UpdateAdRequest, UserResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nostr Adboard API",
        description = "Ad dashboard backend authenticated via Nostr key pairs",
        version = "0.1.0"
    ),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::ads::list_ads,
        crate::handlers::ads::list_ads_by_user,
        crate::handlers::ads::create_ad,
        crate::handlers::ads::get_ad,
        crate::handlers::ads::update_ad,
        crate::handlers::ads::delete_ad,
        crate::handlers::ads::record_impression,
        crate::handlers::ads::record_click,
    ),
    components(schemas(
        Ad,
        CreateAdRequest,
        UpdateAdRequest,
        ImpressionCountResponse,
        ClickCountResponse,
        RegisterRequest,
        LoginRequest,
        UserResponse,
    )),
    tags(
        (name = "Auth", description = "npub registration and login"),
        (name = "Ads", description = "Ad CRUD and engagement counters")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI JSON at /api/docs/openapi.json
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serve the Swagger UI page at /api/docs
pub async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Nostr Adboard API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body { margin: 0; padding: 0; }
        #swagger-ui { max-width: 1200px; margin: 0 auto; padding: 20px; }
        .topbar { display: none; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: '/api/docs/openapi.json',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout'
            });
        };
    </script>
</body>
</html>"#;
