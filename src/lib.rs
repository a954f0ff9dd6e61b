pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod ui;
pub mod utils;
pub mod year;

// Re-export commonly used types
pub use config::Config;
pub use error::ScoutError;
pub use generator::workflow::launch;
