/// Configuration for stream connections
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Send buffer size per connection (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// Consecutive full-buffer sends tolerated before a connection is
    /// considered dead and closed. A sink that cannot absorb heartbeats
    /// belongs to a client that is gone without signalling abort.
    pub max_send_failures: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 32,
            max_send_failures: 3,
        }
    }
}
