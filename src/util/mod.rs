//! Utility modules for stacklens

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
