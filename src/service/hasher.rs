use crate::config::{HasherConfig, HasherKind};
use crate::error::SeedError;
use crate::types::PasswordCheck;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Turns a plaintext password into the value stored in `user.password`.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> impl Future<Output = Result<String, SeedError>> + Send;

    /// Short label for reports and logs.
    fn describe(&self) -> String;
}

/// In-process bcrypt at a fixed cost factor.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, SeedError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(hashed)
    }

    fn describe(&self) -> String {
        format!("bcrypt (cost {})", self.cost)
    }
}

/// Spawns an external program and reads the hash from its stdout.
///
/// Each argument has `{password}` and `{cost}` substituted; the program is
/// executed directly, never through a shell. A relative program path is
/// resolved against the working directory when one is set.
#[derive(Debug, Clone)]
pub struct CommandHasher {
    program: String,
    args: Vec<String>,
    cost: u32,
    workdir: Option<PathBuf>,
}

impl CommandHasher {
    pub fn new(argv: &[String], cost: u32) -> Result<Self, SeedError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SeedError::HasherConfig("hasher.command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            cost,
            workdir: None,
        })
    }

    pub fn with_workdir(mut self, workdir: Option<PathBuf>) -> Self {
        self.workdir = workdir;
        self
    }

    fn render_args(&self, plaintext: &str) -> Vec<String> {
        let cost = self.cost.to_string();
        self.args
            .iter()
            .map(|a| a.replace("{password}", plaintext).replace("{cost}", &cost))
            .collect()
    }
}

impl PasswordHasher for CommandHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, SeedError> {
        debug!(program = %self.program, workdir = ?self.workdir, "spawning external hasher");
        let mut cmd = Command::new(&self.program);
        cmd.args(self.render_args(plaintext)).kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .await
            .map_err(|source| SeedError::HasherSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SeedError::HasherExit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let hashed = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if hashed.is_empty() {
            return Err(SeedError::EmptyHash);
        }
        Ok(hashed)
    }

    fn describe(&self) -> String {
        format!("command `{}` (cost {})", self.program, self.cost)
    }
}

/// Hasher chosen by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredHasher {
    Bcrypt(BcryptHasher),
    Command(CommandHasher),
}

impl ConfiguredHasher {
    pub fn from_config(cfg: &HasherConfig) -> Result<Self, SeedError> {
        Ok(match cfg.kind {
            HasherKind::Bcrypt => ConfiguredHasher::Bcrypt(BcryptHasher::new(cfg.cost)),
            HasherKind::Command => {
                ConfiguredHasher::Command(
                    CommandHasher::new(&cfg.command, cfg.cost)?.with_workdir(cfg.workdir.clone()),
                )
            }
        })
    }
}

impl PasswordHasher for ConfiguredHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, SeedError> {
        match self {
            ConfiguredHasher::Bcrypt(h) => h.hash(plaintext).await,
            ConfiguredHasher::Command(h) => h.hash(plaintext).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfiguredHasher::Bcrypt(h) => h.describe(),
            ConfiguredHasher::Command(h) => h.describe(),
        }
    }
}

/// Check a plaintext against a stored bcrypt hash.
pub async fn check_password(plaintext: &str, stored: &str) -> Result<PasswordCheck, SeedError> {
    let plaintext = plaintext.to_owned();
    let stored = stored.to_owned();
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored)).await?;
    Ok(match outcome {
        Ok(true) => PasswordCheck::Match,
        Ok(false) => PasswordCheck::Mismatch,
        Err(_) => PasswordCheck::Unverifiable,
    })
}
