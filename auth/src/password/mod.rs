pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::PasswordHasher;
pub use hasher::StoredPassword;
pub use hasher::DEFAULT_ITERATIONS;
