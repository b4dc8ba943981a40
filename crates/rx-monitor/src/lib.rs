pub mod backoff;
pub mod client;
pub mod error;
pub mod sse;
pub mod state;

pub use backoff::ReconnectPolicy;
pub use client::{MonitorClient, MonitorConfig};
pub use error::{MonitorError, Result};
pub use sse::SseParser;
pub use state::{EVENT_HISTORY_LIMIT, MonitorState};

#[cfg(test)]
mod tests;
