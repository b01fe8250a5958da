// secp256k1 key generation and key-pair verification

use once_cell::sync::Lazy;
use rand::RngCore;
use secp256k1::{All, Keypair, Secp256k1, SecretKey, XOnlyPublicKey};

use super::nip19;

static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// A freshly generated identity in its Bech32-encoded forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub npub: String,
    pub nsec: String,
}

/// Generate a fresh random key pair. The only failure mode is the system
/// randomness source being unavailable, which panics and is unrecoverable.
pub fn generate_key_pair() -> KeyPair {
    let mut rng = rand::thread_rng();
    let secret = loop {
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf);
        // Rejection-sample the (astronomically unlikely) out-of-range scalars
        if let Ok(secret) = SecretKey::from_slice(&buf) {
            break secret;
        }
    };

    KeyPair {
        npub: nip19::encode_npub(&derive_public_key(&secret)),
        nsec: nip19::encode_nsec(&secret.secret_bytes()),
    }
}

/// True if and only if the nsec deterministically derives the npub. Never
/// panics; malformed input of any kind yields false.
pub fn verify_key_pair(npub: &str, nsec: &str) -> bool {
    let Ok(secret_bytes) = nip19::decode_nsec(nsec) else {
        return false;
    };
    let Ok(secret) = SecretKey::from_slice(&secret_bytes) else {
        return false;
    };
    let Ok(expected) = nip19::decode_npub(npub) else {
        return false;
    };
    derive_public_key(&secret) == expected
}

/// X-only public key bytes for a secret key, per the Nostr key scheme.
fn derive_public_key(secret: &SecretKey) -> [u8; 32] {
    let keypair = Keypair::from_secret_key(&SECP, secret);
    XOnlyPublicKey::from_keypair(&keypair).0.serialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_pairs_verify() {
        for _ in 0..8 {
            let pair = generate_key_pair();
            assert!(pair.npub.starts_with("npub1"));
            assert!(pair.nsec.starts_with("nsec1"));
            assert!(verify_key_pair(&pair.npub, &pair.nsec));
        }
    }

    #[test]
    fn mismatched_pairs_fail() {
        let a = generate_key_pair();
        let b = generate_key_pair();
        assert!(!verify_key_pair(&a.npub, &b.nsec));
        assert!(!verify_key_pair(&b.npub, &a.nsec));
    }

    #[test]
    fn derivation_is_deterministic() {
        let pair = generate_key_pair();
        let secret_bytes = nip19::decode_nsec(&pair.nsec).unwrap();
        let secret = SecretKey::from_slice(&secret_bytes).unwrap();
        assert_eq!(nip19::encode_npub(&derive_public_key(&secret)), pair.npub);
    }

    #[test]
    fn verify_never_panics_on_malformed_input() {
        let pair = generate_key_pair();
        assert!(!verify_key_pair("", ""));
        assert!(!verify_key_pair(&pair.npub, "nsec1truncated"));
        assert!(!verify_key_pair("npub1garbage", &pair.nsec));
        // Swapped prefixes
        assert!(!verify_key_pair(&pair.nsec, &pair.npub));
    }
}
