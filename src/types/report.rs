use serde::Serialize;
use std::fmt::{self, Write as _};

use super::account::StoredAccount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Hash,
    Write,
    Verify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Hash => "hash",
            Stage::Write => "write",
            Stage::Verify => "verify",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StageStatus {
    Ok { detail: String },
    Failed { error: String },
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// What the write stage did to the `user` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum WriteAction {
    Inserted,
    Replaced { removed: u64 },
    Updated { rows: u64 },
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteAction::Inserted => f.write_str("inserted 1 row"),
            WriteAction::Replaced { removed } => {
                write!(f, "replaced account (removed {removed} old row(s))")
            }
            WriteAction::Updated { rows } => write!(f, "updated {rows} existing row(s)"),
        }
    }
}

/// Result of checking the configured plaintext against the stored password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordCheck {
    Match,
    Mismatch,
    /// Stored value is not a bcrypt hash.
    Unverifiable,
}

impl fmt::Display for PasswordCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PasswordCheck::Match => "PASS",
            PasswordCheck::Mismatch => "FAIL",
            PasswordCheck::Unverifiable => "UNVERIFIABLE",
        })
    }
}

/// Everything one seeder run observed, in stage order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub hash: Option<String>,
    pub action: Option<WriteAction>,
    pub rows: Vec<StoredAccount>,
    pub password_check: Option<PasswordCheck>,
    pub stages: Vec<StageReport>,
}

impl SeedReport {
    pub fn record(&mut self, stage: Stage, status: StageStatus) {
        self.stages.push(StageReport { stage, status });
    }

    pub fn status(&self, stage: Stage) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| &s.status)
    }

    /// True when every stage ran and none failed.
    pub fn succeeded(&self) -> bool {
        self.stages.len() == 3
            && self
                .stages
                .iter()
                .all(|s| matches!(s.status, StageStatus::Ok { .. }))
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Generated hash: {}",
            self.hash.as_deref().unwrap_or("")
        );
        for s in &self.stages {
            match &s.status {
                StageStatus::Ok { detail } => {
                    let _ = writeln!(out, "[{}] ok: {}", s.stage, detail);
                }
                StageStatus::Failed { error } => {
                    let _ = writeln!(out, "[{}] failed: {}", s.stage, error);
                }
                StageStatus::Skipped => {
                    let _ = writeln!(out, "[{}] skipped", s.stage);
                }
            }
        }
        if !self.rows.is_empty() {
            let _ = writeln!(out, "Verification:");
            let _ = writeln!(out, "name\temail\tpassword\trole");
            for row in &self.rows {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    row.name, row.email, row.password, row.role
                );
            }
        }
        if let Some(check) = self.password_check {
            let _ = writeln!(out, "Password verification: {check}");
        }
        out
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
