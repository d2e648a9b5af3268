pub mod config;
pub mod logging;
pub mod validate;

pub use config::Config;
pub use logging::init_logging;
