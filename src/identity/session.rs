// Session manager: holds the npub for the lifetime of the session, verifies
// or generates key pairs, and opportunistically pairs the identity with a
// backend user record.
//
// Backend pairing soft-fails by design: local key ownership is sufficient to
// use the app, so a failed login/register call downgrades to guest mode
// instead of failing the login.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::client::{ApiClient, ApiClientError};
use super::keys::{generate_key_pair, verify_key_pair, KeyPair};
use super::nip19::{self, Nip19Error};

/// Fixed key under which the public identifier is stored for the session.
pub const SESSION_NPUB_KEY: &str = "npub";

/// Placeholder sent when registering a generated identity; never used for
/// authentication.
const GENERATED_KEY_PASSWORD: &str = "randomPassword";

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid key pair. Please check your npub and nsec.")]
    InvalidKeyPair,

    #[error("No external signer detected")]
    NoExternalSigner,

    #[error("External signer failed: {0}")]
    Signer(#[source] anyhow::Error),

    #[error(transparent)]
    Nip19(#[from] Nip19Error),
}

/// A capability-providing signing agent (the NIP-07 browser extension seam).
/// Returns the public key in its 64-character hex form.
#[async_trait]
pub trait ExternalSigner: Send + Sync {
    async fn public_key(&self) -> anyhow::Result<String>;
}

/// The authenticated identity for this session. `id`/`username` are present
/// only when backend pairing succeeded; a guest holds just the npub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Option<i32>,
    pub username: Option<String>,
    pub npub: String,
}

impl AuthUser {
    fn guest(npub: &str) -> Self {
        AuthUser {
            id: None,
            username: None,
            npub: npub.to_string(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.id.is_none()
    }
}

/// Volatile session-scoped key/value store, cleared when the session ends.
#[derive(Debug, Default)]
struct SessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}

pub struct SessionManager {
    store: SessionStore,
    signer: Option<Arc<dyn ExternalSigner>>,
    api: ApiClient,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> Self {
        SessionManager {
            store: SessionStore::default(),
            signer: None,
            api,
        }
    }

    pub fn with_signer(api: ApiClient, signer: Arc<dyn ExternalSigner>) -> Self {
        SessionManager {
            store: SessionStore::default(),
            signer: Some(signer),
            api,
        }
    }

    /// Whether a capability-providing signing agent is available.
    pub fn has_external_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Ask the external signer for its public key, re-encoded as npub.
    pub async fn external_signer_public_key(&self) -> Result<String, IdentityError> {
        let signer = self.signer.as_ref().ok_or(IdentityError::NoExternalSigner)?;
        let hex = signer
            .public_key()
            .await
            .map_err(IdentityError::Signer)?;
        Ok(nip19::hex_to_npub(&hex)?)
    }

    /// Manual login with an npub/nsec pair.
    pub async fn login_with_keys(
        &self,
        npub: &str,
        nsec: &str,
    ) -> Result<AuthUser, IdentityError> {
        if !verify_key_pair(npub, nsec) {
            return Err(IdentityError::InvalidKeyPair);
        }

        self.store.set(SESSION_NPUB_KEY, npub);
        Ok(self.pair_with_backend(npub).await)
    }

    /// Login via the external signer.
    pub async fn login_with_external_signer(&self) -> Result<AuthUser, IdentityError> {
        let npub = self.external_signer_public_key().await?;
        self.store.set(SESSION_NPUB_KEY, &npub);
        Ok(self.pair_with_backend(&npub).await)
    }

    /// Generate a fresh key pair, log in with it, and try to register it with
    /// the backend under a derived username.
    pub async fn login_with_generated_keys(&self) -> (KeyPair, AuthUser) {
        let pair = generate_key_pair();
        self.store.set(SESSION_NPUB_KEY, &pair.npub);

        let username = format!("user_{}", &pair.npub[5..12]);
        let user = match self
            .api
            .register(&username, GENERATED_KEY_PASSWORD, &pair.npub)
            .await
        {
            Ok(user) => AuthUser {
                id: Some(user.id),
                username: Some(user.username),
                npub: user.npub,
            },
            Err(err) => {
                warn!("Registration failed, continuing as guest: {}", err);
                AuthUser::guest(&pair.npub)
            },
        };

        (pair, user)
    }

    /// The sole "logged in" signal used for route protection.
    pub fn is_authenticated(&self) -> bool {
        self.current_npub().is_some()
    }

    pub fn current_npub(&self) -> Option<String> {
        self.store.get(SESSION_NPUB_KEY)
    }

    /// Clear the stored identifier. There is no server-side session to
    /// invalidate.
    pub fn logout(&self) {
        self.store.remove(SESSION_NPUB_KEY);
    }

    async fn pair_with_backend(&self, npub: &str) -> AuthUser {
        match self.api.login(npub).await {
            Ok(user) => {
                info!("Paired session with backend user {}", user.id);
                AuthUser {
                    id: Some(user.id),
                    username: Some(user.username),
                    npub: user.npub,
                }
            },
            Err(ApiClientError::NotFound) => {
                info!("No backend record for this npub, continuing as guest");
                AuthUser::guest(npub)
            },
            Err(err) => {
                warn!("Backend pairing failed, continuing as guest: {}", err);
                AuthUser::guest(npub)
            },
        }
    }
}

/// Signer that always fails, for exercising error propagation.
pub struct UnavailableSigner;

#[async_trait]
impl ExternalSigner for UnavailableSigner {
    async fn public_key(&self) -> anyhow::Result<String> {
        Err(anyhow!("signer rejected the request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_round_trip() {
        let store = SessionStore::default();
        assert_eq!(store.get(SESSION_NPUB_KEY), None);

        store.set(SESSION_NPUB_KEY, "npub1example");
        assert_eq!(store.get(SESSION_NPUB_KEY), Some("npub1example".to_string()));

        store.remove(SESSION_NPUB_KEY);
        assert_eq!(store.get(SESSION_NPUB_KEY), None);
    }

    #[tokio::test]
    async fn signer_absence_is_detected() {
        let manager = SessionManager::new(ApiClient::new("http://127.0.0.1:1"));
        assert!(!manager.has_external_signer());
        assert!(matches!(
            manager.external_signer_public_key().await,
            Err(IdentityError::NoExternalSigner)
        ));
    }

    #[tokio::test]
    async fn signer_failure_propagates() {
        let manager = SessionManager::with_signer(
            ApiClient::new("http://127.0.0.1:1"),
            Arc::new(UnavailableSigner),
        );
        assert!(manager.has_external_signer());
        assert!(matches!(
            manager.external_signer_public_key().await,
            Err(IdentityError::Signer(_))
        ));
    }

    #[tokio::test]
    async fn invalid_key_pair_does_not_touch_session() {
        let manager = SessionManager::new(ApiClient::new("http://127.0.0.1:1"));
        let result = manager.login_with_keys("npub1garbage", "nsec1garbage").await;
        assert!(matches!(result, Err(IdentityError::InvalidKeyPair)));
        assert!(!manager.is_authenticated());
    }
}
