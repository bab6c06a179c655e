//! TOML-based configuration: listen/connect sockets, the merge margin,
//! timeouts, and logging, validated at load time.

mod loader;
mod logging;
mod root;
mod validator;

pub use loader::load_from_path;
pub use logging::LoggingConfig;
pub use root::{Config, TimeoutConfig};
pub use validator::validate;
