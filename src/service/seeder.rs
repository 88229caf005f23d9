use crate::config::{Config, FailurePolicy, WriteMode};
use crate::db::AccountStore;
use crate::error::SeedError;
use crate::service::hasher::{ConfiguredHasher, PasswordHasher, check_password};
use crate::types::{SeedReport, Stage, StageStatus, WardenAccount};
use tracing::{info, warn};

/// Runs hash -> write -> verify for one account.
pub struct Seeder<H> {
    account: WardenAccount,
    hasher: H,
    store: AccountStore,
    mode: WriteMode,
    policy: FailurePolicy,
}

impl<H: PasswordHasher> Seeder<H> {
    pub fn new(
        account: WardenAccount,
        hasher: H,
        store: AccountStore,
        mode: WriteMode,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            account,
            hasher,
            store,
            mode,
            policy,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Run every stage. Under `FailurePolicy::Abort` the first failure marks
    /// the remaining stages skipped; under `Continue` all stages run, a failed
    /// hash stage handing an empty hash to the write stage.
    pub async fn run(&self) -> SeedReport {
        let mut report = SeedReport::default();

        let hash = match self.hasher.hash(&self.account.password).await {
            Ok(hash) => {
                info!(hasher = %self.hasher.describe(), len = hash.len(), "computed password hash");
                report.record(
                    Stage::Hash,
                    StageStatus::Ok {
                        detail: self.hasher.describe(),
                    },
                );
                hash
            }
            Err(e) => {
                warn!(error = %e, "password hashing failed");
                report.record(Stage::Hash, failed(&e));
                if self.policy == FailurePolicy::Abort {
                    return skip_rest(report, &[Stage::Write, Stage::Verify]);
                }
                String::new()
            }
        };
        report.hash = Some(hash.clone());

        match self.store.write(&self.account, &hash, self.mode).await {
            Ok(action) => {
                info!(email = %self.account.email, %action, "account written");
                report.action = Some(action);
                report.record(
                    Stage::Write,
                    StageStatus::Ok {
                        detail: action.to_string(),
                    },
                );
            }
            Err(e) => {
                warn!(email = %self.account.email, error = %e, "account write failed");
                report.record(Stage::Write, failed(&e));
                if self.policy == FailurePolicy::Abort {
                    return skip_rest(report, &[Stage::Verify]);
                }
            }
        }

        match self.verify(&mut report).await {
            Ok(count) => {
                info!(email = %self.account.email, rows = count, "account verified");
                report.record(
                    Stage::Verify,
                    StageStatus::Ok {
                        detail: format!("{count} row(s) found"),
                    },
                );
            }
            Err(e) => {
                warn!(email = %self.account.email, error = %e, "verification failed");
                report.record(Stage::Verify, failed(&e));
            }
        }

        report
    }

    async fn verify(&self, report: &mut SeedReport) -> Result<usize, SeedError> {
        let rows = self.store.find_by_email(&self.account.email).await?;
        let Some(first) = rows.first() else {
            return Err(SeedError::AccountMissing {
                email: self.account.email.clone(),
            });
        };
        report.password_check = Some(check_password(&self.account.password, &first.password).await?);
        let count = rows.len();
        report.rows = rows;
        Ok(count)
    }
}

fn failed(e: &SeedError) -> StageStatus {
    StageStatus::Failed {
        error: e.to_string(),
    }
}

fn skip_rest(mut report: SeedReport, stages: &[Stage]) -> SeedReport {
    for stage in stages {
        report.record(*stage, StageStatus::Skipped);
    }
    report
}

/// Build the store and hasher from configuration, initialise the schema when
/// asked to, and run the seeder once.
pub async fn seed_from_config(cfg: &Config) -> Result<SeedReport, SeedError> {
    let store = AccountStore::connect_lazy(&cfg.database)?;
    let hasher = ConfiguredHasher::from_config(&cfg.hasher)?;

    if cfg.database.init_schema {
        info!(backend = ?store.backend(), "initialising user table");
        store.init_schema().await?;
    }

    let seeder = Seeder::new(
        cfg.account.clone(),
        hasher,
        store,
        cfg.seed.mode,
        cfg.seed.on_error,
    );
    let report = seeder.run().await;
    seeder.store().close().await;
    Ok(report)
}
