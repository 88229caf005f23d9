//! Plain data carried through a seeder run.

pub mod account;
pub mod report;

pub use account::{Role, StoredAccount, WardenAccount};
pub use report::{PasswordCheck, SeedReport, Stage, StageStatus, WriteAction};
