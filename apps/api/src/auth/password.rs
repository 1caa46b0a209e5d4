//! Salted, iterated SHA-256 password hashing.
//!
//! Stored format: `sha256$<rounds>$<salt_hex>$<digest_hex>`.

use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const ROUNDS: u32 = 100_000;
const SALT_LEN: usize = 16;

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    encode(&salt, ROUNDS, password)
}

/// Checks `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(rounds), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = hex::decode(salt) else {
        return false;
    };
    if rounds == 0 || salt.is_empty() {
        return false;
    }

    let actual = hex::encode(derive(&salt, rounds, password));
    constant_time_eq(&actual, expected)
}

fn encode(salt: &[u8], rounds: u32, password: &str) -> String {
    format!(
        "{SCHEME}${rounds}${}${}",
        hex::encode(salt),
        hex::encode(derive(salt, rounds, password))
    )
}

fn derive(salt: &[u8], rounds: u32, password: &str) -> Vec<u8> {
    let mut digest = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..rounds {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt)
            .finalize();
    }
    digest.to_vec()
}

/// Constant-time equality comparison for secret strings.
fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_password("password123");
        assert!(verify_password("password123", &stored));
        assert!(!verify_password("password124", &stored));
    }

    #[test]
    fn test_hash_format() {
        let stored = hash_password("pw");
        let parts: Vec<&str> = stored.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "sha256");
        assert_eq!(parts[1], ROUNDS.to_string());
        assert_eq!(parts[2].len(), SALT_LEN * 2);
        assert_eq!(parts[3].len(), 64);
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_known_low_round_hash_verifies() {
        let stored = encode(b"fixedsalt", 3, "secret");
        assert!(verify_password("secret", &stored));
        assert!(stored.starts_with("sha256$3$"));
    }

    #[test]
    fn test_malformed_hashes_never_verify() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "hashed_password_1"));
        assert!(!verify_password("pw", "md5$1$00$00"));
        assert!(!verify_password("pw", "sha256$x$00$00"));
        assert!(!verify_password("pw", "sha256$0$00$00"));
        assert!(!verify_password("pw", "sha256$1$zz$00"));
        assert!(!verify_password("pw", "sha256$1$00$00$extra"));
    }
}
