use super::error::ConfigError;
use super::models::app_env::{AppEnv, Env};
use std::env;
use std::str::FromStr;

impl AppEnv {
    /// Reads the deployment settings from the process environment.
    pub fn new() -> Result<AppEnv, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<AppEnv, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()));

        Ok(AppEnv {
            env: Env::from_str(&get("ENV")?)?,
            server_address: get("SERVER_ADDRESS")?,
            server_port: parse_var("SERVER_PORT", &get("SERVER_PORT")?)?,
            postgres_host: get("POSTGRES_HOST")?,
            postgres_port: match lookup("POSTGRES_PORT") {
                Some(value) => parse_var("POSTGRES_PORT", &value)?,
                None => 5432,
            },
            postgres_user: get("POSTGRES_USER")?,
            postgres_password: get("POSTGRES_PASSWORD")?,
            postgres_database: get("POSTGRES_DATABASE")?,
        })
    }
}

pub(crate) fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name: name.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
