use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    /// Human-readable lines, for local runs and test output.
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Directives used when `RUST_LOG` is unset or invalid.
    pub default_directives: String,
    pub format: LogFormat,
    /// Route output through the test harness capture.
    pub test_writer: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_directives: "info".to_string(),
            format: LogFormat::Json,
            test_writer: false,
        }
    }
}

impl LogSettings {
    /// Compact, captured output at `debug` for the fleetdesk crates.
    pub fn for_tests() -> Self {
        Self {
            default_directives: "info,fleetdesk_client=debug,fleetdesk_auth=debug".to_string(),
            format: LogFormat::Compact,
            test_writer: true,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_directives))
    }
}

/// Install the global subscriber. A second call leaves the first one in place.
pub fn init(settings: LogSettings) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_target(false);

    // try_init fails only when a subscriber is already set.
    let _ = match (settings.format, settings.test_writer) {
        (LogFormat::Json, false) => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        (LogFormat::Json, true) => builder.json().with_test_writer().try_init(),
        (LogFormat::Compact, false) => builder.compact().try_init(),
        (LogFormat::Compact, true) => builder.compact().with_test_writer().try_init(),
    };
}
