//! Async transport glue: one [`direction::DirectionLoop`] per direction of
//! a proxied connection.

pub mod direction;

pub use direction::{ChannelSink, DirectionLoop, InMemorySink, MessageSink};
