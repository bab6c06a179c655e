#![forbid(unsafe_code)]

pub mod config;
pub mod damage;
pub mod error;
pub mod fd;
pub mod interval;
pub mod io;
pub mod protocol;
pub mod telemetry;

pub use config::{load_from_path, Config, TimeoutConfig};
pub use damage::{Bounding, DamageSet};
pub use error::{ProxyError, Result};
pub use fd::{FdTranslationMap, PassthroughFdMap};
pub use interval::{merge, ExtInterval};
pub use io::{ChannelSink, DirectionLoop, InMemorySink, MessageSink};
pub use protocol::{handle_message, DispatchError, DispatchOutcome, ObjectTable, ProtoState};
pub use telemetry::{init_tracing, LogLevel, Logger, Metrics, TracingLogger};
