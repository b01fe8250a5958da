// Nostr key-pair identity and session handling.
//
// Mirrors the browser side of the dashboard: NIP-19 key encoding, local key
// generation/verification, a NIP-07-style external signer seam, and a
// session manager that holds the npub for the lifetime of the session and
// opportunistically pairs it with a backend user record.

pub mod client;
pub mod keys;
pub mod nip19;
pub mod session;

pub use client::{ApiClient, ApiClientError, RemoteUser};
pub use keys::{generate_key_pair, verify_key_pair, KeyPair};
pub use nip19::Nip19Error;
pub use session::{AuthUser, ExternalSigner, IdentityError, SessionManager, SESSION_NPUB_KEY};
