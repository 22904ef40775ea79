pub mod clock;
pub mod config;
pub mod render;
pub mod runner;
pub mod script;

use tracing_subscriber::EnvFilter;

use config::LogFormat;

pub use runner::{Driver, DriverStats};
pub use script::ScriptedChat;

/// Install the global tracing subscriber. `RUST_LOG` picks the filter,
/// defaulting to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
    }
}
