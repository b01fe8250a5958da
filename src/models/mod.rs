pub mod ad;
pub mod user;

pub use ad::{Ad, ClickCountResponse, CreateAdRequest, ImpressionCountResponse, NewAd, UpdateAdRequest};
pub use user::{LoginRequest, NewUser, RegisterRequest, User, UserResponse};
