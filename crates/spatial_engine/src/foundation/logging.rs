//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize logging with a default level filter
///
/// `RUST_LOG` still takes precedence when set. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialized, keeping existing configuration");
    }
}

/// Initialize a logger suitable for unit tests (captured output, ignores repeats)
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
