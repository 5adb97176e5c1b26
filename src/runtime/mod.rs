//! Runtime state shared by interpreter runs

mod environment;
mod observer;
mod value;

pub use environment::{Environment, Iter};
pub use observer::{EventSink, NoopSink, RecordingSink, TracingSink, WriterSink};
pub use value::Value;
