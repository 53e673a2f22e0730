// src/stream/mod.rs

//! Resilient login-status event streaming.
//!
//! Subscribes to the backend's server-sent-event endpoint and keeps the
//! subscription alive across connection drops:
//! - `SseDecoder`: incremental `text/event-stream` wire decoder
//! - `RetryPolicy`: capped exponential backoff with jitter
//! - `EventStreamClient`: background driver dispatching named events to
//!   registered handlers until `close()`

mod backoff;
mod client;
mod sse;

pub use backoff::RetryPolicy;
pub use client::{
    ByteStream, ErrorHandler, EventHandler, EventStreamClient, HttpTransport, OpenHandler,
    StreamHooks, StreamTransport,
};
pub use sse::{SseDecoder, SseEvent};
