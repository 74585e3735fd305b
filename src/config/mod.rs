mod defaults;
mod io;
mod schema;
mod validate;

pub use io::load_config;
pub use schema::{Alerting, Api, Config, Journal, RuntimeConfig, Severity};
pub use validate::ConfigError;
