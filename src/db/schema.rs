//! SQL DDL for the HostelHub `user` table.
//!
//! Only applied when schema initialisation is requested; a real HostelHub
//! database already has the table. Both variants declare `email` UNIQUE, so a
//! second plain insert of the same account is rejected.

use crate::error::SeedError;

pub const MYSQL_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL,
    role VARCHAR(16) NOT NULL DEFAULT 'STUDENT',
    roomnumber VARCHAR(32) NULL,
    createdat TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;

pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'STUDENT' CHECK(role IN ('ADMIN','WARDEN','STUDENT')),
    roomnumber TEXT NULL,
    createdat TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_user_role ON user(role);
"#;

/// Database flavours the seeder can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mysql,
    Sqlite,
}

impl Backend {
    /// Pick the backend from the URL scheme.
    pub fn from_url(url: &str) -> Result<Self, SeedError> {
        let scheme = url
            .split_once(':')
            .map(|(s, _)| s.to_ascii_lowercase())
            .ok_or_else(|| SeedError::InvalidDatabaseUrl(url.to_string()))?;
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Backend::Mysql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(SeedError::UnsupportedBackend(other.to_string())),
        }
    }

    pub fn init_sql(&self) -> &'static str {
        match self {
            Backend::Mysql => MYSQL_INIT,
            Backend::Sqlite => SQLITE_INIT,
        }
    }
}
