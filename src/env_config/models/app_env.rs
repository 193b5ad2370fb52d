use std::fmt;
use std::str::FromStr;

use crate::env_config::error::ConfigError;

/// Deployment environment; selects `config/<env>.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
    Prod,
}

impl FromStr for Env {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Env::Local),
            "dev" => Ok(Env::Dev),
            "prod" => Ok(Env::Prod),
            _ => Err(ConfigError::UnknownEnv(s.to_string())),
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Env::Local => write!(f, "local"),
            Env::Dev => write!(f, "dev"),
            Env::Prod => write!(f, "prod"),
        }
    }
}

/// Settings that come from the process environment: where to listen, where
/// the database lives and how to authenticate.
pub struct AppEnv {
    pub env: Env,
    pub server_address: String,
    pub server_port: u16,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_database: String,
}

impl AppEnv {
    pub fn is_local(&self) -> bool {
        self.env == Env::Local
    }
}

impl fmt::Debug for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppEnv")
            .field("env", &self.env)
            .field("server_address", &self.server_address)
            .field("server_port", &self.server_port)
            .field("postgres_host", &self.postgres_host)
            .field("postgres_port", &self.postgres_port)
            .field("postgres_user", &self.postgres_user)
            .field("postgres_password", &"***")
            .field("postgres_database", &self.postgres_database)
            .finish()
    }
}
