use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;

/// Work factor applied to newly hashed passwords.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SALT_SIZE: usize = 16;
const KEY_SIZE: usize = 32;

/// PBKDF2 output as persisted alongside a user record.
///
/// The iteration count travels with the record so that hashes produced under
/// an older default stay verifiable after the default changes.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPassword {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub iterations: u32,
}

impl std::fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredPassword")
            .field("hash", &"<redacted>")
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// Password hashing implementation.
///
/// PBKDF2-HMAC-SHA256 with a random 128-bit salt and a 256-bit derived key.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    /// Create a hasher using [`DEFAULT_ITERATIONS`].
    pub fn new() -> Self {
        Self::with_iterations(DEFAULT_ITERATIONS)
    }

    /// Create a hasher with a custom work factor for new hashes.
    ///
    /// Verification always uses the iteration count stored on the record,
    /// never this value.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `ZeroIterations` - The configured iteration count is zero
    pub fn hash(&self, password: &str) -> Result<StoredPassword, PasswordError> {
        if self.iterations == 0 {
            return Err(PasswordError::ZeroIterations);
        }

        let mut salt = vec![0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);

        let mut hash = vec![0u8; KEY_SIZE];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, self.iterations, &mut hash);

        Ok(StoredPassword {
            hash,
            salt,
            iterations: self.iterations,
        })
    }

    /// Verify a password against a stored record.
    ///
    /// Derives a key of the same length as the stored hash using the record's
    /// own salt and iteration count, then compares in constant time.
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedRecord` - The stored record has an empty hash or zero iterations
    pub fn verify(&self, password: &str, stored: &StoredPassword) -> Result<bool, PasswordError> {
        if stored.hash.is_empty() || stored.iterations == 0 {
            return Err(PasswordError::MalformedRecord {
                hash_len: stored.hash.len(),
                iterations: stored.iterations,
            });
        }

        let mut candidate = vec![0u8; stored.hash.len()];
        pbkdf2_hmac::<Sha256>(
            password.as_bytes(),
            &stored.salt,
            stored.iterations,
            &mut candidate,
        );

        Ok(candidate.as_slice().ct_eq(stored.hash.as_slice()).into())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
