//! Password hashing

use bcrypt::{hash, verify, BcryptError};

/// The bcrypt cost used for new hashes.
pub const COST: u32 = 8;

/// Hash a password using bcrypt.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password.as_bytes(), COST)
}

/// Compare a plaintext password against a bcrypt hash.
///
/// A malformed hash never matches.
pub fn check_password(password: &str, hash: &str) -> bool {
    verify(password.as_bytes(), hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_check() {
        let hash = hash_password("fZkgzA5W").expect("must hash");

        assert!(check_password("fZkgzA5W", &hash));
        assert!(!check_password("fzkgza5w", &hash));
    }

    #[test]
    fn malformed_hash() {
        assert!(!check_password("fZkgzA5W", "fZkgzA5W"));
    }
}
