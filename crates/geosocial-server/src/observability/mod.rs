//! Observability for geosocial: structured logging setup.

mod logging;

pub use logging::{create_json_layer, init_logging, parse_log_level, LoggingConfig};
