mod health_api;
mod health_db;
mod indicators_status;

pub use health_api::health_api;
pub use health_db::health_db;
pub use indicators_status::indicators_status;
