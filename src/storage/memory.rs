// In-memory storage backend.
//
// Maps behind a single tokio RwLock; every operation takes the lock once and
// never holds it across an await, so sequential counter increments are
// lossless under the single-writer assumption.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{Ad, NewAd, NewUser, UpdateAdRequest, User};

use super::{Storage, StorageError};

#[derive(Debug)]
struct Inner {
    users: HashMap<i32, User>,
    ads: HashMap<i32, Ad>,
    next_user_id: i32,
    next_ad_id: i32,
}

/// HashMap-backed store. Ids are sequential and never reused within the
/// process, even after deletes.
#[derive(Debug)]
pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage {
            inner: RwLock::new(Inner {
                users: HashMap::new(),
                ads: HashMap::new(),
                next_user_id: 1,
                next_ad_id: 1,
            }),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let mut inner = self.inner.write().await;

        // Mirror the unique constraints of the relational backend
        if inner.users.values().any(|u| u.npub == user.npub) {
            return Err(StorageError::Duplicate("npub".to_string()));
        }
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::Duplicate("username".to_string()));
        }

        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let user = User {
            id,
            username: user.username,
            password: user.password,
            npub: user.npub,
            created_at: Utc::now(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: i32) -> Result<Option<User>, StorageError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_by_npub(&self, npub: &str) -> Result<Option<User>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.npub == npub).cloned())
    }

    async fn create_ad(&self, ad: NewAd) -> Result<Ad, StorageError> {
        let mut inner = self.inner.write().await;

        let id = inner.next_ad_id;
        inner.next_ad_id += 1;

        let ad = Ad {
            id,
            user_id: ad.user_id,
            title: ad.title,
            description: ad.description,
            image_url: ad.image_url,
            target_url: ad.target_url,
            budget: ad.budget,
            duration: ad.duration,
            tags: ad.tags,
            status: ad.status,
            impressions: 0,
            clicks: 0,
            created_at: Utc::now(),
        };
        inner.ads.insert(id, ad.clone());
        Ok(ad)
    }

    async fn ad(&self, id: i32) -> Result<Option<Ad>, StorageError> {
        Ok(self.inner.read().await.ads.get(&id).cloned())
    }

    async fn ads_by_user(&self, user_id: i32) -> Result<Vec<Ad>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .ads
            .values()
            .filter(|ad| ad.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn all_ads(&self) -> Result<Vec<Ad>, StorageError> {
        Ok(self.inner.read().await.ads.values().cloned().collect())
    }

    async fn update_ad(
        &self,
        id: i32,
        changes: UpdateAdRequest,
    ) -> Result<Option<Ad>, StorageError> {
        let mut inner = self.inner.write().await;

        let Some(ad) = inner.ads.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(user_id) = changes.user_id {
            ad.user_id = Some(user_id);
        }
        if let Some(title) = changes.title {
            ad.title = title;
        }
        if let Some(description) = changes.description {
            ad.description = description;
        }
        if let Some(image_url) = changes.image_url {
            ad.image_url = Some(image_url);
        }
        if let Some(target_url) = changes.target_url {
            ad.target_url = target_url;
        }
        if let Some(budget) = changes.budget {
            ad.budget = budget;
        }
        if let Some(duration) = changes.duration {
            ad.duration = duration;
        }
        if let Some(tags) = changes.tags {
            ad.tags = Some(tags);
        }
        if let Some(status) = changes.status {
            ad.status = status;
        }

        Ok(Some(ad.clone()))
    }

    async fn delete_ad(&self, id: i32) -> Result<bool, StorageError> {
        Ok(self.inner.write().await.ads.remove(&id).is_some())
    }

    async fn increment_impressions(&self, id: i32) -> Result<Option<Ad>, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.ads.get_mut(&id).map(|ad| {
            ad.impressions += 1;
            ad.clone()
        }))
    }

    async fn increment_clicks(&self, id: i32) -> Result<Option<Ad>, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.ads.get_mut(&id).map(|ad| {
            ad.clicks += 1;
            ad.clone()
        }))
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
