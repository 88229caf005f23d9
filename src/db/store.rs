use crate::config::{DatabaseConfig, WriteMode};
use crate::db::schema::Backend;
use crate::error::SeedError;
use crate::types::{StoredAccount, WardenAccount, WriteAction};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use std::time::Duration;
use tracing::debug;

const INSERT_USER: &str = "INSERT INTO user (name, email, password, role) VALUES (?, ?, ?, ?)";

/// Parameterized access to the HostelHub `user` table.
#[derive(Clone)]
pub struct AccountStore {
    pool: AnyPool,
    backend: Backend,
}

impl AccountStore {
    /// Build a lazily-connecting pool. No I/O happens here, so an unreachable
    /// database surfaces as an error from the first query instead.
    pub fn connect_lazy(cfg: &DatabaseConfig) -> Result<Self, SeedError> {
        let backend = Backend::from_url(&cfg.url)?;
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(cfg.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
            .connect_lazy(&cfg.url)?;
        Ok(Self { pool, backend })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SeedError> {
        // sqlx::query runs one statement at a time
        for stmt in self.backend.init_sql().split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn write(
        &self,
        account: &WardenAccount,
        hash: &str,
        mode: WriteMode,
    ) -> Result<WriteAction, SeedError> {
        match mode {
            WriteMode::Insert => self.insert(account, hash).await,
            WriteMode::Replace => self.replace(account, hash).await,
            WriteMode::Upsert => self.upsert(account, hash).await,
        }
    }

    /// Plain insert. Re-running against a table with a UNIQUE email yields
    /// `DuplicateAccount`; without one it adds another row.
    pub async fn insert(&self, account: &WardenAccount, hash: &str) -> Result<WriteAction, SeedError> {
        sqlx::query(INSERT_USER)
            .bind(account.name.as_str())
            .bind(account.email.as_str())
            .bind(hash)
            .bind(account.role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| SeedError::from_insert(e, &account.email))?;
        Ok(WriteAction::Inserted)
    }

    /// Delete every row with the account's email, then insert, in one transaction.
    pub async fn replace(&self, account: &WardenAccount, hash: &str) -> Result<WriteAction, SeedError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM user WHERE email = ?")
            .bind(account.email.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        debug!(email = %account.email, removed, "deleted previous account rows");

        sqlx::query(INSERT_USER)
            .bind(account.name.as_str())
            .bind(account.email.as_str())
            .bind(hash)
            .bind(account.role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| SeedError::from_insert(e, &account.email))?;

        tx.commit().await?;
        Ok(WriteAction::Replaced { removed })
    }

    /// Update rows with the account's email, or insert when none exist.
    pub async fn upsert(&self, account: &WardenAccount, hash: &str) -> Result<WriteAction, SeedError> {
        let mut tx = self.pool.begin().await?;

        // MySQL reports unchanged rows as unaffected, so count matches up front
        let existing = sqlx::query("SELECT email FROM user WHERE email = ?")
            .bind(account.email.as_str())
            .fetch_all(&mut *tx)
            .await?
            .len() as u64;

        let action = if existing == 0 {
            sqlx::query(INSERT_USER)
                .bind(account.name.as_str())
                .bind(account.email.as_str())
                .bind(hash)
                .bind(account.role.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| SeedError::from_insert(e, &account.email))?;
            WriteAction::Inserted
        } else {
            sqlx::query("UPDATE user SET name = ?, password = ?, role = ? WHERE email = ?")
                .bind(account.name.as_str())
                .bind(hash)
                .bind(account.role.as_str())
                .bind(account.email.as_str())
                .execute(&mut *tx)
                .await?;
            WriteAction::Updated { rows: existing }
        };

        tx.commit().await?;
        Ok(action)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Vec<StoredAccount>, SeedError> {
        let rows = sqlx::query(
            "SELECT name, email, password, role FROM user WHERE email = ? ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_model(row: AnyRow) -> Result<StoredAccount, SeedError> {
        Ok(StoredAccount {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            role: row.try_get("role")?,
        })
    }
}
