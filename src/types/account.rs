use crate::error::SeedError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles accepted by the HostelHub `user` table. Parsing ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Role {
    Admin,
    #[default]
    Warden,
    Student,
}

impl FromStr for Role {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "WARDEN" => Ok(Role::Warden),
            "STUDENT" => Ok(Role::Student),
            _ => Err(SeedError::InvalidRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = SeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Warden => "WARDEN",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account the seeder provisions. The plaintext password is kept out of
/// `Debug` output.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WardenAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for WardenAccount {
    fn default() -> Self {
        Self {
            name: "Warden".to_string(),
            email: "warden@hostel.com".to_string(),
            password: "123456".to_string(),
            role: Role::Warden,
        }
    }
}

impl fmt::Debug for WardenAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WardenAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// A row of the `user` table as read back by the verify stage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_either_case_and_stores_upper() {
        let r: Role = serde_json::from_str(r#""warden""#).unwrap();
        assert_eq!(r, Role::Warden);
        let r: Role = serde_json::from_str(r#""ADMIN""#).unwrap();
        assert_eq!(r, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), r#""STUDENT""#);
    }

    #[test]
    fn role_parsing_ignores_mixed_case() {
        let r: Role = serde_json::from_str(r#""Warden""#).unwrap();
        assert_eq!(r, Role::Warden);
        let r: Role = serde_json::from_str(r#""wArDeN""#).unwrap();
        assert_eq!(r, Role::Warden);
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert!(serde_json::from_str::<Role>(r#""janitor""#).is_err());
        assert!(matches!(
            "janitor".parse::<Role>(),
            Err(SeedError::InvalidRole(r)) if r == "janitor"
        ));
    }

    #[test]
    fn debug_hides_plaintext() {
        let acct = WardenAccount::default();
        let dbg = format!("{acct:?}");
        assert!(dbg.contains("warden@hostel.com"));
        assert!(!dbg.contains("123456"));
    }
}
