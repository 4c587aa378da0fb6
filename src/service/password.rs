use crate::error::app_error::AppError;
use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString};
use std::sync::LazyLock;

// Cost parameters are fixed; the encoded hash carries them, so verification
// of existing hashes keeps working if they are ever raised.
const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

fn argon2() -> Argon2<'static> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LEN)).expect("invalid Argon2 parameters");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// A real Argon2 hash generated once at startup, used as a timing decoy
/// so that login requests for non-existent users take the same time as
/// requests for existing users.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    argon2()
        .hash_password(b"dummy-never-matches", Salt::from(&salt))
        .expect("failed to generate dummy hash")
        .to_string()
});

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2().hash_password(password.as_bytes(), Salt::from(&salt))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored hash. A malformed stored hash counts
/// as a mismatch rather than an error.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    argon2().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Perform a throwaway Argon2 verification to equalize response timing
/// regardless of whether the target account exists.
pub fn dummy_verify(password: &str) {
    let _ = verify_password(&DUMMY_HASH, password);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("correct horse").expect("hashing failed");
        assert!(verify_password(&hash, "correct horse"));
        assert!(!verify_password(&hash, "wrong horse"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password").expect("hashing failed");
        let b = hash_password("same password").expect("hashing failed");
        assert_ne!(a, b);
    }

    #[test]
    fn encoded_hash_carries_fixed_parameters() {
        let hash = hash_password("pw").expect("hashing failed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn malformed_hash_fails_closed() {
        assert!(!verify_password("", "anything"));
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("$argon2id$garbage", "anything"));
    }

    #[test]
    fn dummy_verify_never_panics() {
        dummy_verify("");
        dummy_verify("some password");
    }
}
