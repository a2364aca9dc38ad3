pub mod credential;

pub use credential::PostgresCredentialRepository;
