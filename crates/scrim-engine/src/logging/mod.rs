//! Logger bootstrap for binaries driving the engine. The engine itself only
//! emits through the `log` facade and never touches the global logger.

mod init;

pub use init::{init_logging, LoggingConfig};
