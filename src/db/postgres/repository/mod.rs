pub mod close_repository;
pub mod health_check_repository;
pub mod indicator_repository;
