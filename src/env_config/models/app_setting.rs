use super::{app_config::AppConfig, app_env::AppEnv};

/// Everything read at startup. Immutable afterwards and shared through `Arc`.
#[derive(Debug)]
pub struct AppSettings {
    pub app_config: AppConfig,
    pub app_env: AppEnv,
}
