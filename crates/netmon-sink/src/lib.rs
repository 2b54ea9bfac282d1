//! Downstream sink abstraction: the core only depends on [`Sink`].

pub mod error;
#[cfg(feature = "http-sink")]
pub mod http;
pub mod ring;
pub mod sink;

pub use error::SinkError;
#[cfg(feature = "http-sink")]
pub use http::HttpSink;
pub use ring::RingBufferSink;
pub use sink::Sink;
