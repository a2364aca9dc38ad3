use thiserror::Error;

/// Error type for PBKDF2 password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Iteration count must be positive")]
    ZeroIterations,

    #[error("Stored password record is malformed: {hash_len}-byte hash, {iterations} iterations")]
    MalformedRecord { hash_len: usize, iterations: u32 },
}
