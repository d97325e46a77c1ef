pub mod health_handler;
pub mod metrics_handler;
pub mod rate_limit;
pub mod relay_handler;
pub mod ui_handler;
