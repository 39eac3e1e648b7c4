pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

mod app_context;

pub use app_context::{AppContext, StartupError};
pub use config::AppConfig;

#[cfg(test)]
pub(crate) mod test_support;
