pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::SeedError;
pub use service::{Seeder, seed_from_config};
pub use types::{SeedReport, WardenAccount};
