// Configuration module
pub mod settings;

pub use settings::{DetectionConfig, LoggingConfig, Settings};
