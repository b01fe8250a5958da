// Ad model and CRUD request/response DTOs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::schema::ads;

/// Accepted values for the free-form status field. Transitions between them
/// are caller-directed; no transition graph is enforced.
pub const AD_STATUSES: [&str; 4] = ["pending", "active", "paused", "ended"];

pub const DEFAULT_AD_STATUS: &str = "pending";

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if AD_STATUSES.contains(&status) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("invalid_status");
        error.message = Some("Status must be one of pending, active, paused, ended".into());
        Err(error)
    }
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Advertisement record
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = ads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "userId": 1,
    "title": "Lightning coffee",
    "description": "Pay for coffee over Lightning",
    "imageUrl": null,
    "targetUrl": "https://example.com",
    "budget": 10000,
    "duration": 7,
    "tags": "coffee,bitcoin",
    "status": "pending",
    "impressions": 0,
    "clicks": 0,
    "createdAt": "2025-06-01T12:00:00Z"
}))]
pub struct Ad {
    pub id: i32,
    pub user_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub target_url: String,
    /// Informational; no monetary logic is enforced.
    pub budget: i32,
    /// Days; informational only, no expiry scheduler exists.
    pub duration: i32,
    /// Comma-joined, not normalized.
    pub tags: Option<String>,
    pub status: String,
    pub impressions: i32,
    pub clicks: i32,
    pub created_at: DateTime<Utc>,
}

/// New ad for insertion; id, counters, and creation timestamp are assigned
/// by the storage backend.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ads)]
pub struct NewAd {
    pub user_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub target_url: String,
    pub budget: i32,
    pub duration: i32,
    pub tags: Option<String>,
    pub status: String,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request body for POST /api/ads
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdRequest {
    pub user_id: Option<i32>,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid image URL format"))]
    pub image_url: Option<String>,

    #[validate(url(message = "Invalid target URL format"))]
    #[validate(length(max = 8192, message = "Target URL must be less than 8192 characters"))]
    pub target_url: String,

    #[validate(range(min = 0, message = "Budget must be non-negative"))]
    pub budget: i32,

    #[validate(range(min = 0, message = "Duration must be non-negative"))]
    pub duration: i32,

    #[validate(length(max = 500, message = "Tags must be less than 500 characters"))]
    pub tags: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

impl From<CreateAdRequest> for NewAd {
    fn from(request: CreateAdRequest) -> Self {
        NewAd {
            user_id: request.user_id,
            title: request.title,
            description: request.description.unwrap_or_default(),
            image_url: request.image_url,
            target_url: request.target_url,
            budget: request.budget,
            duration: request.duration,
            tags: request.tags,
            status: request.status.unwrap_or_else(|| DEFAULT_AD_STATUS.to_string()),
        }
    }
}

/// Request body for PATCH /api/ads/{id}. Supplied fields are merged over the
/// existing record; omitted fields are left untouched. Doubles as the Diesel
/// changeset for the Postgres backend, which skips `None` fields.
#[derive(Debug, Clone, Default, Deserialize, Validate, AsChangeset, ToSchema)]
#[diesel(table_name = ads)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdRequest {
    pub user_id: Option<i32>,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid image URL format"))]
    pub image_url: Option<String>,

    #[validate(url(message = "Invalid target URL format"))]
    pub target_url: Option<String>,

    #[validate(range(min = 0, message = "Budget must be non-negative"))]
    pub budget: Option<i32>,

    #[validate(range(min = 0, message = "Duration must be non-negative"))]
    pub duration: Option<i32>,

    #[validate(length(max = 500, message = "Tags must be less than 500 characters"))]
    pub tags: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

impl UpdateAdRequest {
    /// True when at least one field is supplied. An all-empty changeset is a
    /// no-op read; Diesel rejects UPDATE statements with no SET clause.
    pub fn has_changes(&self) -> bool {
        self.user_id.is_some()
            || self.title.is_some()
            || self.description.is_some()
            || self.image_url.is_some()
            || self.target_url.is_some()
            || self.budget.is_some()
            || self.duration.is_some()
            || self.tags.is_some()
            || self.status.is_some()
    }
}

/// Response body for POST /api/ads/{id}/impression
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImpressionCountResponse {
    pub impressions: i32,
}

/// Response body for POST /api/ads/{id}/click
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClickCountResponse {
    pub clicks: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateAdRequest {
        CreateAdRequest {
            user_id: None,
            title: "X".to_string(),
            description: None,
            image_url: None,
            target_url: "http://x".to_string(),
            budget: 10000,
            duration: 7,
            tags: None,
            status: None,
        }
    }

    #[test]
    fn create_request_defaults_status_to_pending() {
        let ad = NewAd::from(create_request());
        assert_eq!(ad.status, "pending");
        assert_eq!(ad.description, "");
    }

    #[test]
    fn create_request_rejects_unknown_status() {
        let mut request = create_request();
        request.status = Some("archived".to_string());
        assert!(request.validate().is_err());

        request.status = Some("paused".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_request_rejects_malformed_target_url() {
        let mut request = create_request();
        request.target_url = "not a url".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_reports_changes() {
        assert!(!UpdateAdRequest::default().has_changes());

        let update = UpdateAdRequest {
            status: Some("active".to_string()),
            ..Default::default()
        };
        assert!(update.has_changes());
    }
}
