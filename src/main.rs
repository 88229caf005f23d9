use clap::Parser;
use mimalloc::MiMalloc;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use warden_seed::config::{FailurePolicy, HasherKind, OutputFormat, WriteMode};
use warden_seed::types::Role;
use warden_seed::{Config, seed_from_config};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Seed the HostelHub warden account: hash, write, verify.
#[derive(Parser, Debug)]
#[command(name = "warden-seed", version)]
struct Args {
    /// Path to a TOML config file (default: ./warden.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database URL (mysql://... or sqlite:...)
    #[arg(long)]
    database_url: Option<String>,

    /// Create the user table if it does not exist
    #[arg(long)]
    init_schema: bool,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Plaintext password (prefer WARDEN_ACCOUNT__PASSWORD)
    #[arg(long)]
    password: Option<String>,

    #[arg(long, value_enum, ignore_case = true)]
    role: Option<Role>,

    #[arg(long, value_enum)]
    hasher: Option<HasherKind>,

    /// bcrypt cost factor
    #[arg(long)]
    cost: Option<u32>,

    /// Directory the external hasher command runs in
    #[arg(long, value_name = "DIR")]
    hasher_workdir: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<WriteMode>,

    /// What to do when a stage fails
    #[arg(long, value_enum)]
    on_error: Option<FailurePolicy>,

    /// Shorthand for `--on-error continue`
    #[arg(long, conflicts_with = "on_error")]
    keep_going: bool,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Override log level (info, debug, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(self, cfg: &mut Config) {
        if let Some(url) = self.database_url {
            cfg.database.url = url;
        }
        if self.init_schema {
            cfg.database.init_schema = true;
        }
        if let Some(name) = self.name {
            cfg.account.name = name;
        }
        if let Some(email) = self.email {
            cfg.account.email = email;
        }
        if let Some(password) = self.password {
            cfg.account.password = password;
        }
        if let Some(role) = self.role {
            cfg.account.role = role;
        }
        if let Some(kind) = self.hasher {
            cfg.hasher.kind = kind;
        }
        if let Some(cost) = self.cost {
            cfg.hasher.cost = cost;
        }
        if let Some(dir) = self.hasher_workdir {
            cfg.hasher.workdir = Some(dir);
        }
        if let Some(mode) = self.mode {
            cfg.seed.mode = mode;
        }
        if let Some(policy) = self.on_error {
            cfg.seed.on_error = policy;
        }
        if self.keep_going {
            cfg.seed.on_error = FailurePolicy::Continue;
        }
        if let Some(format) = self.format {
            cfg.seed.format = format;
        }
        if let Some(level) = self.log_level {
            cfg.loglevel = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut cfg = Config::load(args.config.as_deref())?;
    args.apply(&mut cfg);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.redacted_database_url(),
        email = %cfg.account.email,
        role = %cfg.account.role,
        mode = ?cfg.seed.mode,
        on_error = ?cfg.seed.on_error,
        "seeding account"
    );

    let report = match seed_from_config(&cfg).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "seeder could not start");
            return Ok(ExitCode::FAILURE);
        }
    };

    match cfg.seed.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }

    if report.succeeded() || cfg.seed.on_error == FailurePolicy::Continue {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_error_flag_overrides_file_setting_both_ways() {
        let mut cfg = Config::default();
        cfg.seed.on_error = FailurePolicy::Continue;
        Args::parse_from(["warden-seed", "--on-error", "abort"]).apply(&mut cfg);
        assert_eq!(cfg.seed.on_error, FailurePolicy::Abort);

        Args::parse_from(["warden-seed", "--keep-going"]).apply(&mut cfg);
        assert_eq!(cfg.seed.on_error, FailurePolicy::Continue);

        assert!(
            Args::try_parse_from(["warden-seed", "--keep-going", "--on-error", "abort"]).is_err()
        );
    }

    #[test]
    fn hasher_workdir_and_role_flags_apply() {
        let mut cfg = Config::default();
        Args::parse_from([
            "warden-seed",
            "--hasher",
            "command",
            "--hasher-workdir",
            "/srv/hostelhub/backend",
            "--role",
            "Admin",
        ])
        .apply(&mut cfg);
        assert_eq!(cfg.hasher.kind, HasherKind::Command);
        assert_eq!(
            cfg.hasher.workdir,
            Some(PathBuf::from("/srv/hostelhub/backend"))
        );
        assert_eq!(cfg.account.role, Role::Admin);
    }
}
