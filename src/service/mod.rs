pub mod hasher;
pub mod seeder;

pub use hasher::{BcryptHasher, CommandHasher, ConfiguredHasher, PasswordHasher};
pub use seeder::{Seeder, seed_from_config};
