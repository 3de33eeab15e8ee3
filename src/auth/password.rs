use tracing::error;

/// bcrypt work factor. Changing it requires no migration: the cost is
/// embedded in each stored hash.
const COST: u32 = 12;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// False on mismatch or on a malformed stored hash; a wrong password is
/// never an error.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "testpassword123";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn hash_is_long_and_differs_from_plaintext() {
        let password = "testpassword123";
        let hash = hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.len() > 50);
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrongpassword", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
    }
}
