//! Structured logging configuration.
//!
//! Log output goes through `tracing-subscriber`, either as one JSON object
//! per line or as pretty text for local runs:
//!
//! ```json
//! {"timestamp":"...","level":"INFO","target":"geosocial_domain::search::engine","fields":{"message":"community search complete","result_users":3}}
//! ```
//!
//! `RUST_LOG` overrides the configured level, e.g.
//! `RUST_LOG=geosocial_domain=trace` shows every visited node.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Resolved `logging` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One JSON object per line instead of pretty text
    pub json_format: bool,
    /// Used when RUST_LOG is not set
    pub default_level: Level,
}

impl LoggingConfig {
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            json_format: settings.json,
            default_level: parse_log_level(&settings.level),
        }
    }
}

/// Maps a configured level name to a `tracing` level, falling back to INFO.
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize the global subscriber.
///
/// Call once at startup. Later calls leave the first subscriber in place.
/// Logs go to stderr so that stdout carries only the query export.
pub fn init_logging(config: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );

        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true),
        );

        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Creates a JSON subscriber writing to `writer`, used to capture logs in tests.
pub fn create_json_layer<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use geosocial_domain::{CommunitySearch, KeywordId, QueryParams, SearchRequest, UserId};
    use geosocial_storage::MemoryGraphStore;

    /// A writer that captures output to a shared buffer.
    #[derive(Clone)]
    struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CaptureWriter {
        fn new() -> Self {
            Self {
                buffer: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn output(&self) -> String {
            let buffer = self.buffer.lock().unwrap();
            String::from_utf8_lossy(&buffer).to_string()
        }
    }

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            level: "WARN".to_string(),
            json: true,
        };
        let config = LoggingConfig::from_settings(&settings);
        assert!(config.json_format);
        assert_eq!(config.default_level, Level::WARN);

        let text = LoggingConfig::from_settings(&LoggingSettings {
            level: "nonsense".to_string(),
            json: false,
        });
        assert_eq!(
            text,
            LoggingConfig {
                json_format: false,
                default_level: Level::INFO,
            }
        );
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace"), Level::TRACE);
        assert_eq!(parse_log_level("Debug"), Level::DEBUG);
        assert_eq!(parse_log_level("error"), Level::ERROR);
        assert_eq!(parse_log_level("verbose"), Level::INFO);
    }

    /// Test: search logs are emitted as JSON lines with their span context
    #[test]
    fn test_search_logs_are_json_formatted() {
        let store = MemoryGraphStore::new_shared();
        let q = UserId::new("q").unwrap();
        store
            .add_user(q.clone(), [KeywordId::new("a").unwrap()].into())
            .unwrap();
        let engine = CommunitySearch::new(store);

        let writer = CaptureWriter::new();
        let subscriber = create_json_layer(writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            engine
                .search(&SearchRequest::new(q, QueryParams::distance(1, 1.0, 0)))
                .unwrap();
        });

        let output = writer.output();
        assert!(!output.is_empty(), "search should log");

        for line in output.lines().filter(|l| !l.is_empty()) {
            let json: serde_json::Value = serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("log line should be JSON: {line} ({e})"));
            assert!(json.get("level").is_some());
            assert!(json.get("target").is_some());
        }
        assert!(output.contains("geosocial_domain"));
    }
}
