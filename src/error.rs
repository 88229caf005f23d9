use sqlx::Error as SqlxError;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid database URL `{0}` (missing scheme)")]
    InvalidDatabaseUrl(String),

    #[error("Invalid role `{0}` (expected ADMIN, WARDEN or STUDENT)")]
    InvalidRole(String),

    #[error("Unsupported database backend `{0}` (expected mysql or sqlite)")]
    UnsupportedBackend(String),

    #[error("Failed to spawn hasher `{program}`: {source}")]
    HasherSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Hasher exited with {status}: {stderr}")]
    HasherExit { status: ExitStatus, stderr: String },

    #[error("Hasher produced an empty hash")]
    EmptyHash,

    #[error("Hasher is not configured: {0}")]
    HasherConfig(String),

    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Account {email} already exists")]
    DuplicateAccount { email: String },

    #[error("No account found for {email}")]
    AccountMissing { email: String },
}

impl From<figment::Error> for SeedError {
    fn from(e: figment::Error) -> Self {
        SeedError::Config(Box::new(e))
    }
}

impl SeedError {
    /// Map a driver error on insert, turning unique-key violations into
    /// `DuplicateAccount`.
    pub fn from_insert(e: SqlxError, email: &str) -> Self {
        match &e {
            SqlxError::Database(db) if db.is_unique_violation() => SeedError::DuplicateAccount {
                email: email.to_string(),
            },
            _ => SeedError::Database(e),
        }
    }
}
