// NIP-19 Bech32 encodings for Nostr keys: npub (x-only public key) and nsec
// (secret key), both carrying exactly 32 bytes.

use bech32::{Bech32, Hrp};
use thiserror::Error;

const NPUB_HRP: Hrp = Hrp::parse_unchecked("npub");
const NSEC_HRP: Hrp = Hrp::parse_unchecked("nsec");

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Nip19Error {
    #[error("not a valid bech32 string: {0}")]
    Malformed(String),

    #[error("wrong key prefix: expected '{expected}', found '{found}'")]
    WrongPrefix {
        expected: &'static str,
        found: String,
    },

    #[error("invalid key length: expected 32 bytes, found {0}")]
    InvalidLength(usize),

    #[error("invalid hex key: {0}")]
    InvalidHex(String),
}

pub fn encode_npub(key: &[u8; 32]) -> String {
    encode(NPUB_HRP, key)
}

pub fn encode_nsec(key: &[u8; 32]) -> String {
    encode(NSEC_HRP, key)
}

pub fn decode_npub(npub: &str) -> Result<[u8; 32], Nip19Error> {
    decode(npub, NPUB_HRP, "npub")
}

pub fn decode_nsec(nsec: &str) -> Result<[u8; 32], Nip19Error> {
    decode(nsec, NSEC_HRP, "nsec")
}

/// Re-encode a 64-character hex public key (the form NIP-07 signers return)
/// as an npub.
pub fn hex_to_npub(hex: &str) -> Result<String, Nip19Error> {
    Ok(encode_npub(&hex_to_key(hex)?))
}

/// Decode an npub to its 64-character hex form.
pub fn npub_to_hex(npub: &str) -> Result<String, Nip19Error> {
    Ok(key_to_hex(&decode_npub(npub)?))
}

fn encode(hrp: Hrp, key: &[u8; 32]) -> String {
    // A 32-byte payload is 63 characters encoded, well under the 90-character
    // bech32 limit, so encoding cannot fail.
    bech32::encode::<Bech32>(hrp, key).expect("32-byte key fits in a bech32 string")
}

fn decode(encoded: &str, expected: Hrp, name: &'static str) -> Result<[u8; 32], Nip19Error> {
    let (hrp, data) =
        bech32::decode(encoded).map_err(|e| Nip19Error::Malformed(e.to_string()))?;

    if hrp != expected {
        return Err(Nip19Error::WrongPrefix {
            expected: name,
            found: hrp.to_string(),
        });
    }

    let len = data.len();
    data.try_into().map_err(|_| Nip19Error::InvalidLength(len))
}

fn key_to_hex(key: &[u8; 32]) -> String {
    key.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_to_key(hex: &str) -> Result<[u8; 32], Nip19Error> {
    if hex.len() != 64 || !hex.is_ascii() {
        return Err(Nip19Error::InvalidHex(format!(
            "expected 64 hex characters, found {}",
            hex.len()
        )));
    }

    let mut key = [0u8; 32];
    for (i, byte) in key.iter_mut().enumerate() {
        let pair = &hex[i * 2..i * 2 + 2];
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| Nip19Error::InvalidHex(format!("invalid hex pair '{}'", pair)))?;
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npub_round_trip() {
        let key = [42u8; 32];
        let npub = encode_npub(&key);
        assert!(npub.starts_with("npub1"));
        assert_eq!(npub.len(), 63);
        assert_eq!(decode_npub(&npub), Ok(key));
    }

    #[test]
    fn nsec_round_trip() {
        let key = [7u8; 32];
        let nsec = encode_nsec(&key);
        assert!(nsec.starts_with("nsec1"));
        assert_eq!(decode_nsec(&nsec), Ok(key));
    }

    #[test]
    fn decode_rejects_wrong_prefix() {
        let nsec = encode_nsec(&[1u8; 32]);
        assert!(matches!(
            decode_npub(&nsec),
            Err(Nip19Error::WrongPrefix { expected: "npub", .. })
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_npub("npub1"), Err(Nip19Error::Malformed(_))));
        assert!(matches!(
            decode_npub("not even bech32"),
            Err(Nip19Error::Malformed(_))
        ));
        // Truncation corrupts the checksum
        let npub = encode_npub(&[3u8; 32]);
        assert!(decode_npub(&npub[..npub.len() - 4]).is_err());
    }

    #[test]
    fn hex_round_trip() {
        let key = [0xabu8; 32];
        let npub = encode_npub(&key);
        let hex = npub_to_hex(&npub).unwrap();
        assert_eq!(hex, "ab".repeat(32));
        assert_eq!(hex_to_npub(&hex).unwrap(), npub);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(hex_to_npub("abc").is_err());
        assert!(hex_to_npub(&"zz".repeat(32)).is_err());
    }
}
