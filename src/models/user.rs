// User model and auth request/response DTOs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::schema::users;

lazy_static! {
    // "npub1" plus 58 characters from the bech32 alphabet (52 data + 6 checksum)
    static ref NPUB_REGEX: Regex = Regex::new(r"^npub1[02-9ac-hj-np-z]{58}$").unwrap();
}

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// User record. The password is stored as supplied and never verified or
/// returned by any endpoint; authentication is key ownership, proven
/// client-side.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub npub: String,
    pub created_at: DateTime<Utc>,
}

/// New user for insertion; id and creation timestamp are assigned by the
/// storage backend.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub npub: String,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request body for POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    pub password: String,

    #[validate(regex(path = "NPUB_REGEX", message = "Invalid npub format"))]
    pub npub: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        NewUser {
            username: request.username,
            password: request.password,
            npub: request.npub,
        }
    }
}

/// Request body for POST /api/auth/login. The npub is optional at the serde
/// level so a missing field produces the documented 400 rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub npub: Option<String>,
}

/// Public view of a user; never includes the password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub npub: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            npub: user.npub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npub_regex_accepts_wellformed_keys() {
        let npub = format!("npub1{}", "q".repeat(58));
        assert!(NPUB_REGEX.is_match(&npub));
    }

    #[test]
    fn npub_regex_rejects_wrong_prefix_and_length() {
        assert!(!NPUB_REGEX.is_match(&format!("nsec1{}", "q".repeat(58))));
        assert!(!NPUB_REGEX.is_match("npub1tooshort"));
        // 'b' and 'i' are not in the bech32 alphabet
        assert!(!NPUB_REGEX.is_match(&format!("npub1{}", "b".repeat(58))));
    }

    #[test]
    fn register_request_validation() {
        let request = RegisterRequest {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            npub: format!("npub1{}", "q".repeat(58)),
        };
        assert!(request.validate().is_ok());

        let bad = RegisterRequest {
            npub: "not-an-npub".to_string(),
            ..request
        };
        assert!(bad.validate().is_err());
    }
}
